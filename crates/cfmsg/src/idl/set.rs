// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Collection of parsed definitions resolved into schemas as a unit.

use super::parser::{parse_message, parse_service, MsgFile, SrvFile, TypeRef};
use super::{duration_schema, time_schema, ParseError};
use crate::catalog::{CatalogError, SchemaCatalog};
use crate::schema::{Constant, FieldDescriptor, FieldKind, FieldType, Schema};
use crate::service::ServiceDefinition;
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// Message and service definitions waiting to be resolved.
///
/// References between definitions may appear in any order; they are
/// resolved depth-first when the set is registered. Types already present
/// in the target catalog satisfy references too.
#[derive(Debug, Default, Clone)]
pub struct InterfaceSet {
    messages: BTreeMap<String, MsgFile>,
    services: BTreeMap<String, SrvFile>,
}

/// What [`InterfaceSet::register_into`] added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSummary {
    /// Newly registered type names, in dependency order.
    pub types: Vec<String>,
    /// Newly registered service names, sorted.
    pub services: Vec<String>,
}

/// Error raised while registering a resolved set.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterError {
    Parse(ParseError),
    Catalog(CatalogError),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Parse(e) => write!(f, "{}", e),
            Self::Catalog(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for RegisterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(e) => Some(e),
            Self::Catalog(e) => Some(e),
        }
    }
}

impl From<ParseError> for RegisterError {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

impl From<CatalogError> for RegisterError {
    fn from(e: CatalogError) -> Self {
        Self::Catalog(e)
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

impl InterfaceSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `.msg` text for `package/name`.
    pub fn add_message_text(&mut self, package: &str, name: &str, text: &str) -> Result<(), ParseError> {
        self.add_message(parse_message(package, name, text)?)
    }

    /// Add `.srv` text for `package/name`.
    pub fn add_service_text(&mut self, package: &str, name: &str, text: &str) -> Result<(), ParseError> {
        self.add_service(parse_service(package, name, text)?)
    }

    pub fn add_message(&mut self, msg: MsgFile) -> Result<(), ParseError> {
        let full = msg.full_name();
        if self.defines(&full) {
            return Err(ParseError::DuplicateDefinition(full));
        }
        self.messages.insert(full, msg);
        Ok(())
    }

    pub fn add_service(&mut self, srv: SrvFile) -> Result<(), ParseError> {
        let full = srv.full_name();
        for name in [&full, &srv.request.full_name(), &srv.response.full_name()] {
            if self.defines(name) || self.services.contains_key(name) {
                return Err(ParseError::DuplicateDefinition(name.clone()));
            }
        }
        self.services.insert(full, srv);
        Ok(())
    }

    /// Load `<dir>/<package>/msg/*.msg` and `<dir>/<package>/srv/*.srv`.
    ///
    /// Returns the number of files read.
    pub fn load_dir(&mut self, dir: &Path) -> Result<usize, ParseError> {
        let mut count = 0;
        for package_dir in sorted_entries(dir)? {
            if !package_dir.is_dir() {
                continue;
            }
            let Some(package) = file_stem(&package_dir) else {
                continue;
            };
            for (sub, ext) in [("msg", "msg"), ("srv", "srv")] {
                let sub_dir = package_dir.join(sub);
                if !sub_dir.is_dir() {
                    continue;
                }
                for path in sorted_entries(&sub_dir)? {
                    if path.extension().and_then(|e| e.to_str()) != Some(ext) {
                        continue;
                    }
                    let Some(name) = file_stem(&path) else {
                        continue;
                    };
                    let text = fs::read_to_string(&path).map_err(|e| ParseError::Io {
                        path: path.display().to_string(),
                        message: e.to_string(),
                    })?;
                    if ext == "msg" {
                        self.add_message_text(&package, &name, &text)?;
                    } else {
                        self.add_service_text(&package, &name, &text)?;
                    }
                    count += 1;
                }
            }
        }
        log::debug!("idl: loaded {} definition files from {}", count, dir.display());
        Ok(count)
    }

    /// Message type names defined directly (not via services), sorted.
    pub fn message_names(&self) -> Vec<&str> {
        self.messages.keys().map(String::as_str).collect()
    }

    /// Service names, sorted.
    pub fn service_names(&self) -> Vec<&str> {
        self.services.keys().map(String::as_str).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty() && self.services.is_empty()
    }

    /// Resolve every definition against `catalog` and register the result.
    ///
    /// Definitions identical to types already in the catalog are skipped.
    /// Nothing is registered if any definition fails to resolve.
    pub fn register_into(&self, catalog: &mut SchemaCatalog) -> Result<RegisterSummary, RegisterError> {
        let mut resolver = Resolver {
            set: self,
            catalog,
            marks: HashMap::new(),
            resolved: HashMap::new(),
            order: Vec::new(),
            stack: Vec::new(),
        };
        for name in self.definition_names() {
            resolver.resolve(&name, None)?;
        }
        let Resolver {
            resolved, order, ..
        } = resolver;

        // Validate everything before mutating the catalog.
        let mut fresh = Vec::new();
        for name in &order {
            let schema = &resolved[name];
            match catalog.lookup(name) {
                Ok(existing) if existing == *schema => {}
                Ok(_) => return Err(CatalogError::DuplicateType(name.clone()).into()),
                Err(_) => fresh.push(schema.clone()),
            }
        }
        for name in self.services.keys() {
            if catalog.contains_service(name) {
                return Err(CatalogError::DuplicateService(name.clone()).into());
            }
        }

        let mut summary = RegisterSummary::default();
        for schema in fresh {
            summary.types.push(schema.name().to_string());
            catalog.register_arc(schema)?;
        }
        for (name, srv) in &self.services {
            let request = resolved[&srv.request.full_name()].clone();
            let response = resolved[&srv.response.full_name()].clone();
            catalog.register_service(ServiceDefinition::new(name.clone(), request, response))?;
            summary.services.push(name.clone());
        }
        Ok(summary)
    }

    /// Resolve into a fresh catalog.
    pub fn into_catalog(self) -> Result<SchemaCatalog, RegisterError> {
        let mut catalog = SchemaCatalog::new();
        self.register_into(&mut catalog)?;
        Ok(catalog)
    }

    fn defines(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    fn lookup(&self, name: &str) -> Option<&MsgFile> {
        if let Some(msg) = self.messages.get(name) {
            return Some(msg);
        }
        self.services.values().find_map(|srv| {
            [&srv.request, &srv.response]
                .into_iter()
                .find(|m| m.full_name() == name)
        })
    }

    fn definition_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.messages.keys().cloned().collect();
        for srv in self.services.values() {
            names.push(srv.request.full_name());
            names.push(srv.response.full_name());
        }
        names
    }
}

struct Resolver<'a> {
    set: &'a InterfaceSet,
    catalog: &'a SchemaCatalog,
    marks: HashMap<String, Mark>,
    resolved: HashMap<String, Arc<Schema>>,
    order: Vec<String>,
    stack: Vec<String>,
}

impl Resolver<'_> {
    /// Resolve a defined type. `origin` is the referencing field's file and line.
    fn resolve(&mut self, name: &str, origin: Option<(&str, usize)>) -> Result<Arc<Schema>, ParseError> {
        match self.marks.get(name) {
            Some(Mark::Done) => return Ok(self.resolved[name].clone()),
            Some(Mark::Visiting) => {
                let start = self.stack.iter().position(|n| n == name).unwrap_or(0);
                let mut cycle = self.stack[start..].to_vec();
                cycle.push(name.to_string());
                return Err(ParseError::Cycle(cycle));
            }
            None => {}
        }

        let set = self.set;
        let Some(msg) = set.lookup(name) else {
            if let Ok(existing) = self.catalog.lookup(name) {
                return Ok(existing);
            }
            let (file, line) = origin.unwrap_or(("<root>", 0));
            return Err(ParseError::UnresolvedType {
                file: file.to_string(),
                line,
                type_name: name.to_string(),
            });
        };

        self.marks.insert(name.to_string(), Mark::Visiting);
        self.stack.push(name.to_string());

        let file = msg.file_label();
        let mut fields = Vec::with_capacity(msg.fields.len());
        for decl in &msg.fields {
            let kind = match &decl.type_ref {
                TypeRef::Primitive(kind) => kind.clone(),
                TypeRef::Time => FieldKind::Message(self.builtin(time_schema())),
                TypeRef::Duration => FieldKind::Message(self.builtin(duration_schema())),
                TypeRef::Named(target) => {
                    FieldKind::Message(self.resolve(target, Some((file.as_str(), decl.line)))?)
                }
            };
            let field_type = match decl.array {
                None => FieldType::scalar(kind),
                Some(crate::schema::ArrayMarker::Variable) => FieldType::sequence(kind),
                Some(crate::schema::ArrayMarker::Fixed(n)) => FieldType::fixed_array(kind, n),
            };
            fields.push(FieldDescriptor::new(decl.name.clone(), field_type));
        }
        let constants = msg
            .constants
            .iter()
            .map(|c| Constant {
                name: c.name.clone(),
                kind: c.kind.clone(),
                value: c.value.clone(),
            })
            .collect();

        let schema = Schema::with_constants(name, fields, constants)
            .map_err(|error| ParseError::Schema { file, error })?;
        let schema = Arc::new(schema);

        self.stack.pop();
        self.marks.insert(name.to_string(), Mark::Done);
        self.resolved.insert(name.to_string(), schema.clone());
        self.order.push(name.to_string());
        Ok(schema)
    }

    /// Record a built-in nested type (`time`, `duration`) once.
    fn builtin(&mut self, schema: Arc<Schema>) -> Arc<Schema> {
        if let Some(existing) = self.resolved.get(schema.name()) {
            return existing.clone();
        }
        let name = schema.name().to_string();
        self.marks.insert(name.clone(), Mark::Done);
        self.resolved.insert(name.clone(), schema.clone());
        self.order.push(name);
        schema
    }
}

fn sorted_entries(dir: &Path) -> Result<Vec<std::path::PathBuf>, ParseError> {
    let io = |e: std::io::Error| ParseError::Io {
        path: dir.display().to_string(),
        message: e.to_string(),
    };
    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(io)? {
        paths.push(entry.map_err(io)?.path());
    }
    paths.sort();
    Ok(paths)
}

fn file_stem(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_order_references() {
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "Outer", "Inner inner\nInner[] many\n")
            .expect("outer");
        set.add_message_text("pkg", "Inner", "float32 x\n").expect("inner");

        let catalog = set.into_catalog().expect("register");
        let outer = catalog.lookup("pkg/Outer").expect("outer");
        assert_eq!(outer.nested().next().map(|s| s.name()), Some("pkg/Inner"));
        assert_eq!(catalog.names(), vec!["pkg/Inner", "pkg/Outer"]);
    }

    #[test]
    fn test_cycle_detected() {
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "A", "B b\n").expect("a");
        set.add_message_text("pkg", "B", "A a\n").expect("b");
        let err = set.into_catalog().unwrap_err();
        assert_eq!(
            err,
            RegisterError::Parse(ParseError::Cycle(vec![
                "pkg/A".into(),
                "pkg/B".into(),
                "pkg/A".into()
            ]))
        );
    }

    #[test]
    fn test_unresolved_reference_reports_line() {
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "Pose", "float64 x\nMissing m\n")
            .expect("pose");
        let err = set.into_catalog().unwrap_err();
        assert_eq!(
            err,
            RegisterError::Parse(ParseError::UnresolvedType {
                file: "pkg/Pose.msg".into(),
                line: 2,
                type_name: "pkg/Missing".into(),
            })
        );
    }

    #[test]
    fn test_references_resolve_against_catalog() {
        let mut base = InterfaceSet::new();
        base.add_message_text("geometry_msgs", "Point", "float64 x\nfloat64 y\nfloat64 z\n")
            .expect("point");
        let mut catalog = base.into_catalog().expect("base");

        let mut set = InterfaceSet::new();
        set.add_service_text("pkg", "GoTo", "geometry_msgs/Point goal\n---\n")
            .expect("goto");
        let summary = set.register_into(&mut catalog).expect("register");
        assert_eq!(summary.types, vec!["pkg/GoToRequest", "pkg/GoToResponse"]);
        assert_eq!(summary.services, vec!["pkg/GoTo"]);
        assert!(catalog.lookup_service("pkg/GoTo").is_ok());
    }

    #[test]
    fn test_failed_registration_leaves_catalog_unchanged() {
        let mut catalog = SchemaCatalog::new();
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "Good", "uint8 a\n").expect("good");
        set.add_message_text("pkg", "Bad", "Nope n\n").expect("bad");
        assert!(set.register_into(&mut catalog).is_err());
        assert!(catalog.is_empty());
    }

    #[test]
    fn test_duplicate_definitions() {
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "TakeoffRequest", "uint8 a\n").expect("msg");
        let err = set
            .add_service_text("pkg", "Takeoff", "uint8 a\n---\n")
            .unwrap_err();
        assert_eq!(err, ParseError::DuplicateDefinition("pkg/TakeoffRequest".into()));
    }

    #[test]
    fn test_time_and_duration_layout() {
        let mut set = InterfaceSet::new();
        set.add_message_text("pkg", "Stamped", "time stamp\nduration span\n")
            .expect("msg");
        let catalog = set.into_catalog().expect("register");
        let schema = catalog.lookup("pkg/Stamped").expect("schema");
        assert_eq!(schema.fixed_size(), Some(16));
        assert!(catalog.contains("time"));
        assert!(catalog.contains("duration"));
    }

    #[test]
    fn test_load_dir() {
        let dir = tempfile::tempdir().expect("tempdir");
        let msg_dir = dir.path().join("demo_pkg").join("msg");
        let srv_dir = dir.path().join("demo_pkg").join("srv");
        fs::create_dir_all(&msg_dir).expect("msg dir");
        fs::create_dir_all(&srv_dir).expect("srv dir");
        fs::write(msg_dir.join("Sample.msg"), "float32 value\n").expect("write");
        fs::write(msg_dir.join("README.md"), "ignored").expect("write");
        fs::write(srv_dir.join("Reset.srv"), "Sample initial\n---\nbool ok\n").expect("write");

        let mut set = InterfaceSet::new();
        assert_eq!(set.load_dir(dir.path()), Ok(2));
        assert_eq!(set.message_names(), vec!["demo_pkg/Sample"]);
        assert_eq!(set.service_names(), vec!["demo_pkg/Reset"]);

        let catalog = set.into_catalog().expect("register");
        assert_eq!(catalog.service_count(), 1);
    }
}
