// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// End-to-end mapping over the synthetic shop catalog: idempotence, cycles,
// generic sharing, nullability, collections, exclusion and enums.

#![allow(clippy::missing_panics_doc)]

mod common;

use common::{catalog, shared_config, ty};
use std::cell::RefCell;
use std::collections::HashSet;
use std::sync::Arc;
use typegraph::{
    EnumValue, MapError, MapperConfig, Model, ModelMapper, Namespace, Pipeline, Ref,
    TypeCatalog, TypeDescriptor, TypeId, TypeKind, TypeProvider,
};

fn app() -> Namespace {
    Namespace::from("App")
}

fn person_ref() -> Ref {
    Ref::structure(app(), "Person", Vec::new())
}

fn field<'m>(model: &'m Model, name: &str) -> &'m Ref {
    &model
        .fields()
        .iter()
        .find(|f| f.name == name)
        .unwrap_or_else(|| panic!("no field {name} on {}", model.name()))
        .ty
}

fn model<'m>(models: &'m [Model], name: &str) -> &'m Model {
    models
        .iter()
        .find(|m| m.name() == name)
        .unwrap_or_else(|| panic!("no model {name}"))
}

#[test]
fn map_is_idempotent() {
    let catalog = catalog();
    let person = ty(&catalog, "App.Person");
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));

    let first = mapper.map(person).unwrap();
    let count = mapper.get_models().unwrap().len();
    let second = mapper.map(person).unwrap();

    assert_eq!(first, second);
    assert_eq!(first, person_ref());
    assert_eq!(mapper.get_models().unwrap().len(), count);
    assert_eq!(mapper.roots(), &[person_ref()]);
}

#[test]
fn cyclic_types_get_one_model_each() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Person")).unwrap();

    let models = mapper.get_models().unwrap();
    let names: Vec<&str> = models.iter().map(Model::name).collect();
    assert_eq!(names, vec!["Person", "Color", "Manager"]);

    let manager = model(models, "Manager").as_struct().unwrap();
    assert_eq!(manager.base(), Some(&person_ref()));
    assert_eq!(manager.fields()[0].ty, Ref::array(person_ref()));
    assert!(manager.is_populated());

    let person = model(models, "Person");
    assert_eq!(field(person, "friends"), &Ref::array(person_ref()));
    assert_eq!(
        field(person, "manager"),
        &Ref::nullable(Ref::structure(app(), "Manager", Vec::new()))
    );
}

#[test]
fn ignored_types_are_invisible() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Person")).unwrap();

    let models = mapper.get_models().unwrap();
    let person = model(models, "Person").as_struct().unwrap();
    assert!(person.base().is_none());
    assert!(person.fields().iter().all(|f| f.name != "root"));
    assert_eq!(person.fields().len(), 9);
    assert!(models.iter().all(|m| m.name() != "Object"));
}

#[test]
fn members_built_from_ignored_types_are_dropped() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    let bag = mapper.map(ty(&catalog, "App.Bag")).unwrap();
    assert_eq!(bag, Ref::structure(app(), "Bag", Vec::new()));

    let models = mapper.get_models().unwrap();
    assert_eq!(models.len(), 1);
    let names: Vec<&str> = models[0].fields().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["count"]);
}

#[test]
fn ignored_type_as_root_is_unclassified() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    let err = mapper.map(ty(&catalog, "App.ObjectList")).unwrap_err();
    assert!(matches!(
        &err,
        MapError::Unclassified { type_name, .. } if type_name == "System.Object"
    ));
    assert!(mapper.get_models().unwrap().is_empty());
}

#[test]
fn generic_instantiations_share_one_model() {
    let mut catalog = catalog();
    let boxed = ty(&catalog, "App.Box");
    let int = ty(&catalog, "System.Int32");
    let string = ty(&catalog, "System.String");
    let box_int = catalog.instantiate(boxed, &[int]).unwrap();
    let box_string = catalog.instantiate(boxed, &[string]).unwrap();

    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    let a = mapper.map(box_int).unwrap();
    let b = mapper.map(box_string).unwrap();

    assert_eq!(a, Ref::structure(app(), "Box", vec![Ref::base("number")]));
    assert_eq!(b, Ref::structure(app(), "Box", vec![Ref::base("string")]));
    assert_eq!(a.target(), b.target());

    let models = mapper.get_models().unwrap();
    assert_eq!(models.len(), 1);
    let template = &models[0];
    assert_eq!(template.args(), &[Ref::generic_parameter("T")]);
    assert_eq!(field(template, "value"), &Ref::generic_parameter("T"));
    assert_eq!(
        field(template, "items"),
        &Ref::array(Ref::generic_parameter("T"))
    );
}

#[test]
fn self_referential_generic_terminates() {
    let mut catalog = catalog();
    let node = ty(&catalog, "App.Node");
    let int = ty(&catalog, "System.Int32");
    let node_int = catalog.instantiate(node, &[int]).unwrap();

    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    assert_eq!(mapper.map(node_int).unwrap().to_string(), "Node<number>");

    let models = mapper.get_models().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(field(&models[0], "next").to_string(), "Node<T> | null");
}

#[test]
fn nullable_round_trip() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Person")).unwrap();

    let models = mapper.get_models().unwrap();
    let person = model(models, "Person");
    assert_eq!(field(person, "id"), &Ref::base("number"));
    assert_eq!(field(person, "age"), &Ref::nullable(Ref::base("number")));
    assert_eq!(field(person, "nickname"), &Ref::nullable(Ref::base("string")));
    assert_eq!(field(person, "name"), &Ref::base("string"));
}

#[test]
fn arrays_and_records_are_told_apart() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Person")).unwrap();

    let models = mapper.get_models().unwrap();
    let person = model(models, "Person");
    assert_eq!(field(person, "friends"), &Ref::array(person_ref()));
    assert_eq!(
        field(person, "scores"),
        &Ref::record(Ref::base("string"), Ref::base("number"))
    );
    // Collections never get models of their own.
    assert!(models
        .iter()
        .all(|m| !matches!(m.name(), "List" | "Dictionary" | "IEnumerable" | "IDictionary")));
}

#[test]
fn collection_subclasses_process_their_elements() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    assert_eq!(
        mapper.map(ty(&catalog, "App.PersonIndex")).unwrap(),
        Ref::record(Ref::base("string"), person_ref())
    );
    let models = mapper.get_models().unwrap();
    assert!(model(models, "Person").as_struct().unwrap().is_populated());
    assert!(models.iter().all(|m| m.name() != "PersonIndex"));

    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    assert_eq!(
        mapper.map(ty(&catalog, "App.People")).unwrap(),
        Ref::array(person_ref())
    );
    let models = mapper.get_models().unwrap();
    assert!(model(models, "Person").as_struct().unwrap().is_populated());
    assert!(models.iter().all(|m| m.name() != "People"));

    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Directory")).unwrap();
    let models = mapper.get_models().unwrap();
    let directory = model(models, "Directory");
    assert_eq!(
        field(directory, "index"),
        &Ref::record(Ref::base("string"), person_ref())
    );
    assert_eq!(field(directory, "people"), &Ref::array(person_ref()));
    assert!(model(models, "Person").as_struct().unwrap().is_populated());
}

#[test]
fn self_containing_collection_becomes_a_model() {
    let catalog = catalog();
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Forest")).unwrap();

    let tree = Ref::structure(app(), "Tree", Vec::new());
    let models = mapper.get_models().unwrap();
    let names: Vec<&str> = models.iter().map(Model::name).collect();
    assert_eq!(names, vec!["Forest", "Tree"]);

    let forest = model(models, "Forest");
    assert_eq!(field(forest, "tree"), &tree);
    assert_eq!(field(forest, "trees"), &Ref::array(tree.clone()));
    assert_eq!(field(forest, "maybe"), &Ref::nullable(tree.clone()));

    let tree_model = model(models, "Tree").as_struct().unwrap();
    assert_eq!(tree_model.interfaces(), &[Ref::array(tree)]);
}

/// Records every handle the mapper asks about.
struct Recording<'c> {
    inner: &'c TypeCatalog,
    seen: RefCell<HashSet<TypeId>>,
}

impl TypeProvider for Recording<'_> {
    fn describe(&self, ty: TypeId) -> Option<&TypeDescriptor> {
        self.seen.borrow_mut().insert(ty);
        self.inner.describe(ty)
    }
}

#[test]
fn excluded_types_stay_opaque() {
    let catalog = catalog();
    let recording = Recording {
        inner: &catalog,
        seen: RefCell::new(HashSet::new()),
    };
    let mut mapper = ModelMapper::new(&recording, shared_config(&catalog));
    mapper.map(ty(&catalog, "App.Person")).unwrap();

    let models = mapper.get_models().unwrap();
    assert_eq!(field(model(models, "Person"), "secret"), &Ref::base("Secret"));
    assert!(models
        .iter()
        .all(|m| m.namespace() != &Namespace::from("Vendor.Internal")));

    let blob = ty(&catalog, "Vendor.Internal.Blob");
    assert!(!recording.seen.borrow().contains(&blob));

    let secret = ty(&catalog, "Vendor.Internal.Secret");
    assert_eq!(mapper.map(secret).unwrap(), Ref::base("Secret"));
    assert!(!recording.seen.borrow().contains(&blob));
}

#[test]
fn enum_maps_to_model_and_reference() {
    let catalog = catalog();
    let color = ty(&catalog, "App.Color");
    let mut mapper = ModelMapper::new(&catalog, shared_config(&catalog));

    assert_eq!(mapper.map(color).unwrap(), Ref::enumeration(app(), "Color"));
    let models = mapper.get_models().unwrap();
    let model = models[0].as_enum().unwrap();
    assert_eq!(model.namespace, app());
    assert_eq!(model.name, "Color");
    assert_eq!(
        model.values,
        vec![
            EnumValue::new("Red", 0),
            EnumValue::new("Green", 1),
            EnumValue::new("Blue", 2)
        ]
    );
}

#[test]
fn promises_and_interfaces() {
    let catalog = catalog();
    let service = ty(&catalog, "App.Service");
    let iservice = ty(&catalog, "App.IService");
    let mut mapper =
        ModelMapper::new(&catalog, shared_config(&catalog)).with_implementations(&catalog);

    assert_eq!(mapper.map(service).unwrap(), Ref::structure(app(), "Service", Vec::new()));
    assert_eq!(mapper.implementations(iservice), vec![service]);

    let models = mapper.get_models().unwrap();
    let service_model = model(models, "Service").as_struct().unwrap();
    assert_eq!(
        service_model.interfaces(),
        &[Ref::interface(app(), "IService", Vec::new())]
    );

    let iface = model(models, "IService");
    assert!(iface.as_interface().is_some());
    assert_eq!(field(iface, "pending"), &Ref::promise(Some(person_ref())));
    assert_eq!(field(iface, "done"), &Ref::promise(None));
    assert!(models.iter().all(|m| m.name() != "Task"));
}

#[test]
fn includes_are_processed_once_on_demand() {
    let catalog = catalog();
    let color = ty(&catalog, "App.Color");
    let config = common::config(&catalog).include(color);
    let mut mapper = ModelMapper::new(&catalog, Arc::new(config));

    let models = mapper.get_models().unwrap();
    assert_eq!(models.len(), 1);
    assert_eq!(models[0].name(), "Color");
    assert_eq!(mapper.get_models().unwrap().len(), 1);
    assert!(mapper.roots().is_empty());
}

/// Minimal hand-written provider.
struct Synthetic(Vec<TypeDescriptor>);

impl TypeProvider for Synthetic {
    fn describe(&self, ty: TypeId) -> Option<&TypeDescriptor> {
        self.0.get(ty.0 as usize)
    }
}

#[test]
fn duplicate_names_are_ambiguous() {
    let class = TypeKind::Class { is_abstract: false };
    let mut holder = TypeDescriptor::new("Holder", "App", class.clone());
    holder.members = vec![
        typegraph::Member::new("a", TypeId(0)),
        typegraph::Member::new("b", TypeId(1)),
    ];
    let provider = Synthetic(vec![
        TypeDescriptor::new("Widget", "App", class.clone()),
        TypeDescriptor::new("Widget", "App..", class),
        holder,
    ]);

    let mut mapper = ModelMapper::new(&provider, Arc::new(MapperConfig::new()));
    let err = mapper.map(TypeId(2)).unwrap_err();
    assert!(matches!(
        &err,
        MapError::AmbiguousIdentity { name, .. } if name == "Widget"
    ));
    // The failed call left nothing behind.
    assert!(mapper.get_models().unwrap().is_empty());

    mapper.map(TypeId(0)).unwrap();
    assert_eq!(mapper.get_models().unwrap().len(), 1);
}

#[test]
fn sessions_on_threads_share_pipeline_and_config() {
    let catalog = catalog();
    let config = shared_config(&catalog);
    let pipeline = Pipeline::standard();
    let person = ty(&catalog, "App.Person");

    let artifacts: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let config = Arc::clone(&config);
                let pipeline = pipeline.clone();
                let catalog = &catalog;
                scope.spawn(move || {
                    let mut mapper = ModelMapper::with_pipeline(catalog, config, pipeline);
                    mapper.map(person).unwrap();
                    mapper.artifact().unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert!(artifacts.windows(2).all(|w| w[0] == w[1]));
    assert_eq!(artifacts[0].models.len(), 3);
}
