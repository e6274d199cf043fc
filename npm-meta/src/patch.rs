//! # Metadata Patches
//!
//! A small subset of JSON Patch (RFC 6902): `add` and `replace` against object
//! members addressed by JSON Pointers (RFC 6901). A [`Patch`] is applied to a copy
//! of the target document, so a failing operation leaves nothing half-written.

use crate::error::{MetaError, MetaResult};
use serde_json::{Map, Value};
use std::fmt;

/// A JSON Pointer held as unescaped reference tokens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pointer(Vec<String>);

impl Pointer {
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for Pointer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for token in &self.0 {
            write!(f, "/{}", token.replace('~', "~0").replace('/', "~1"))?;
        }
        Ok(())
    }
}

/// A single patch operation
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOp {
    /// Create or overwrite the member; the parent object must exist.
    Add { path: Pointer, value: Value },
    /// Overwrite an existing member.
    Replace { path: Pointer, value: Value },
}

impl PatchOp {
    pub fn path(&self) -> &Pointer {
        match self {
            PatchOp::Add { path, .. } | PatchOp::Replace { path, .. } => path,
        }
    }

    fn apply_in_place(&self, doc: &mut Value) -> MetaResult<()> {
        let path = self.path();
        let (last, parents) = path
            .tokens()
            .split_last()
            .ok_or_else(|| MetaError::patch(path, "whole-document replacement is not supported"))?;
        let parent = parent_object(doc, parents, path)?;

        match self {
            PatchOp::Add { value, .. } => {
                parent.insert(last.clone(), value.clone());
            }
            PatchOp::Replace { value, .. } => match parent.get_mut(last) {
                Some(slot) => *slot = value.clone(),
                None => {
                    return Err(MetaError::patch(
                        path,
                        format!("member '{last}' does not exist"),
                    ))
                }
            },
        }
        Ok(())
    }
}

fn parent_object<'a>(
    doc: &'a mut Value,
    parents: &[String],
    path: &Pointer,
) -> MetaResult<&'a mut Map<String, Value>> {
    let mut current = doc;
    for token in parents {
        current = match current {
            Value::Object(map) => map
                .get_mut(token)
                .ok_or_else(|| MetaError::patch(path, format!("parent '{token}' is missing")))?,
            _ => {
                return Err(MetaError::patch(
                    path,
                    format!("cannot descend into '{token}': not an object"),
                ))
            }
        };
    }
    current
        .as_object_mut()
        .ok_or_else(|| MetaError::patch(path, "target container is not an object"))
}

/// An ordered sequence of patch operations
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Patch {
    ops: Vec<PatchOp>,
}

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, path: Pointer, value: Value) -> &mut Self {
        self.ops.push(PatchOp::Add { path, value });
        self
    }

    pub fn replace(&mut self, path: Pointer, value: Value) -> &mut Self {
        self.ops.push(PatchOp::Replace { path, value });
        self
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Applies every operation in order to a copy of `doc`.
    pub fn apply(&self, doc: &Value) -> MetaResult<Value> {
        let mut patched = doc.clone();
        for op in &self.ops {
            op.apply_in_place(&mut patched)?;
        }
        Ok(patched)
    }
}
