// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com
//
// Shared synthetic type system for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use typegraph::{MapperConfig, TypeCatalog, TypeId};

pub const SHOP: &str = r#"
types:
  - { name: Object, namespace: System }
  - { name: Int32, namespace: System, kind: value }
  - { name: String, namespace: System }

  - { name: IEnumerable, namespace: System.Collections.Generic, kind: interface, params: [T] }
  - { name: KeyValuePair, namespace: System.Collections.Generic, kind: value, params: [K, V] }
  - name: IDictionary
    namespace: System.Collections.Generic
    kind: interface
    params: [K, V]
    implements: ["IEnumerable<KeyValuePair<K, V>>"]
  - name: List
    namespace: System.Collections.Generic
    params: [T]
    implements: ["IEnumerable<T>"]
  - name: Dictionary
    namespace: System.Collections.Generic
    params: [K, V]
    implements: ["IDictionary<K, V>"]

  - { name: Task, namespace: System.Threading.Tasks, params: [T] }
  - { name: Completion, namespace: System.Threading.Tasks }

  - name: Color
    namespace: App
    kind: enum
    values: [Red, Green, Blue]

  - name: Person
    namespace: App
    extends: Object
    fields:
      - { name: id, type: Int32 }
      - { name: name, type: String }
      - { name: age, type: "Int32?" }
      - { name: nickname, type: "String?" }
      - { name: friends, type: "List<Person>" }
      - { name: scores, type: "Dictionary<String, Int32>" }
      - { name: favorite, type: Color }
      - { name: manager, type: "Manager?" }
      - { name: secret, type: Secret }
      - { name: root, type: Object }
  - name: Manager
    namespace: App
    extends: Person
    fields:
      - { name: reports, type: "Person[]" }

  - name: Box
    namespace: App
    params: [T]
    fields:
      - { name: value, type: T }
      - { name: items, type: "List<T>" }
  - name: Node
    namespace: App
    params: [T]
    fields:
      - { name: value, type: T }
      - { name: next, type: "Node<T>?" }

  - name: IService
    namespace: App
    kind: interface
    fields:
      - { name: pending, type: "Task<Person>" }
      - { name: done, type: Completion }
  - name: Service
    namespace: App
    implements: [IService]
    fields:
      - { name: pending, type: "Task<Person>" }
      - { name: done, type: Completion }
  - { name: ServiceBase, namespace: App, kind: abstract, implements: [IService] }

  - name: Bag
    namespace: App
    fields:
      - { name: count, type: Int32 }
      - { name: direct, type: Object }
      - { name: maybe, type: "Object?" }
      - { name: items, type: "List<Object>" }
      - { name: array, type: "Object[]" }
      - { name: pending, type: "Task<Object>" }
      - { name: lookup, type: "Dictionary<String, Object>" }
      - { name: list, type: ObjectList }
  - { name: ObjectList, namespace: App, extends: "List<Object>" }

  - { name: PersonIndex, namespace: App, extends: "Dictionary<String, Person>" }
  - { name: People, namespace: App, extends: "List<Person>" }
  - name: Directory
    namespace: App
    fields:
      - { name: index, type: PersonIndex }
      - { name: people, type: People }

  - { name: Tree, namespace: App, implements: ["IEnumerable<Tree>"] }
  - name: Forest
    namespace: App
    fields:
      - { name: tree, type: Tree }
      - { name: trees, type: "Tree[]" }
      - { name: maybe, type: "Tree?" }

  - name: Secret
    namespace: Vendor.Internal
    fields:
      - { name: payload, type: Blob }
  - { name: Blob, namespace: Vendor.Internal }
"#;

pub fn catalog() -> TypeCatalog {
    TypeCatalog::from_yaml_str(SHOP).unwrap()
}

pub fn ty(catalog: &TypeCatalog, full_name: &str) -> TypeId {
    catalog
        .lookup(full_name)
        .unwrap_or_else(|| panic!("{full_name} is not declared"))
}

/// Base types, collection shapes, `System.Object` ignored, `Vendor.*` excluded.
pub fn config(catalog: &TypeCatalog) -> MapperConfig {
    MapperConfig::new()
        .with_base_type(ty(catalog, "System.Int32"), "number")
        .with_base_type(ty(catalog, "System.String"), "string")
        .array_shape(ty(catalog, "System.Collections.Generic.IEnumerable"))
        .record_shape(ty(catalog, "System.Collections.Generic.IDictionary"))
        .mark_promise(ty(catalog, "System.Threading.Tasks.Task"))
        .mark_promise(ty(catalog, "System.Threading.Tasks.Completion"))
        .ignore_when(|_, d| d.namespace == "System" && d.name == "Object")
        .exclude_when(|_, d| d.namespace.starts_with("Vendor"))
}

pub fn shared_config(catalog: &TypeCatalog) -> Arc<MapperConfig> {
    Arc::new(config(catalog))
}
