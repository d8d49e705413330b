//! Testing utilities for the DMS workspace
//!
//! Shared fixtures, a frozen clock, a recording store observer and
//! proptest strategies over document trees.

#![allow(missing_docs)]

use chrono::NaiveDate;
use dms_store::{ModuleCatalog, ModuleDescriptor, Revision, SeedDocument, TreeObserver};
use dms_tree::{
    Clock, DocumentNode, FileFormat, Forest, ModificationStamp, NodePath, UnknownExtensionPolicy,
};
use proptest::prelude::*;
use std::cell::RefCell;
use std::rc::Rc;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn stamp() -> ModificationStamp {
    ModificationStamp::new(date(2024, 5, 20), "Carlos Silva")
}

pub fn folder(id: &str, name: &str, children: Vec<DocumentNode>) -> DocumentNode {
    DocumentNode::folder_with(id, name, stamp(), children.into())
}

/// File whose format is inferred from `name`
pub fn file(id: &str, name: &str) -> DocumentNode {
    let format = FileFormat::from_file_name(name, UnknownExtensionPolicy::Unknown);
    DocumentNode::file(id, name, format, Some("1 KB".into()), stamp())
}

pub fn link(id: &str, name: &str, target: &str) -> DocumentNode {
    DocumentNode::link(id, name, target, stamp())
}

/// Clock stuck on one date
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDate);

impl Default for FixedClock {
    fn default() -> Self {
        Self(date(2024, 6, 3))
    }
}

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}

/// One observed store write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    pub key: String,
    pub len: usize,
    pub revision: Revision,
}

/// Observer that records every write; clones share the log
#[derive(Debug, Clone, Default)]
pub struct ChangeLog(Rc<RefCell<Vec<Change>>>);

impl ChangeLog {
    pub fn entries(&self) -> Vec<Change> {
        self.0.borrow().clone()
    }
}

impl TreeObserver for ChangeLog {
    fn tree_changed(&mut self, key: &str, forest: &Forest, revision: Revision) {
        self.0.borrow_mut().push(Change {
            key: key.to_string(),
            len: forest.len(),
            revision,
        });
    }
}

/// `{"/logistica-docs": [FolderA{id:1, children:[FileX{id:2}]}]}`
pub fn logistics_seed() -> SeedDocument {
    let module = ModuleDescriptor {
        id: "logistics-docs".into(),
        name: "Logistics Documents".into(),
        icon: "logistics".into(),
        admin_only: false,
        path: "/logistica-docs".into(),
        sub_folders: Vec::new(),
    };
    let mut seed = SeedDocument {
        modules: ModuleCatalog::new(vec![module]),
        ..SeedDocument::default()
    };
    seed.trees.insert(
        "/logistica-docs".into(),
        Forest::unit(folder("1", "FolderA", vec![file("2", "FileX.pdf")])),
    );
    seed
}

#[derive(Debug, Clone)]
enum Shape {
    File,
    Link,
    Folder(Vec<Shape>),
}

fn shape() -> impl Strategy<Value = Shape> {
    let leaf = prop_oneof![Just(Shape::File), Just(Shape::Link)];
    leaf.prop_recursive(4, 48, 4, |inner| {
        prop::collection::vec(inner, 0..4).prop_map(Shape::Folder)
    })
}

fn build(shapes: &[Shape], next: &mut usize) -> Forest {
    let mut level = Forest::new();
    for shape in shapes {
        *next += 1;
        let id = format!("n{next}");
        let node = match shape {
            Shape::File => file(&id, "doc.pdf"),
            Shape::Link => link(&id, "site", "https://example.com"),
            Shape::Folder(children) => {
                let children = build(children, next);
                DocumentNode::folder_with(id.as_str(), format!("folder {id}"), stamp(), children)
            }
        };
        level.push_back(node);
    }
    level
}

/// Random trees with ids `n1, n2, ...` unique across the whole tree
pub fn arb_forest() -> impl Strategy<Value = Forest> {
    prop::collection::vec(shape(), 0..5).prop_map(|shapes| build(&shapes, &mut 0))
}

/// Every folder path in `forest`, the root included
pub fn folder_paths(forest: &Forest) -> Vec<NodePath> {
    fn collect(level: &Forest, prefix: &NodePath, out: &mut Vec<NodePath>) {
        out.push(prefix.clone());
        for node in level {
            if let Some(children) = node.children() {
                collect(children, &prefix.child(node.id().clone()), out);
            }
        }
    }
    let mut out = Vec::new();
    collect(forest, &NodePath::root(), &mut out);
    out
}
