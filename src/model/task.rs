//! The Task entity and the id types the two storage backends assign.

use std::fmt::{self, Debug, Display};
use std::str::FromStr;

use mongodb::bson::oid::{self, ObjectId};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

use crate::error::TaskError;

/// Capability shared by every task id type.
///
/// Ids arrive as URL path segments (`FromStr`) and leave as a JSON field whose
/// name depends on the backend.
pub trait TaskKey:
    Serialize + FromStr + Display + Debug + Clone + PartialEq + Send + Sync + 'static
{
    /// JSON field name the id is written under
    const FIELD: &'static str;
}

/// Monotonic integer id assigned by the in-memory backend.
///
/// Starts at 1 and is never reused, so deleting a task leaves a gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct SequentialId(u64);

impl SequentialId {
    pub const FIRST: SequentialId = SequentialId(1);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    /// The id handed out after this one
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Display for SequentialId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for SequentialId {
    type Err = TaskError;

    /// Only the canonical decimal form names a task: no sign, no leading zeros.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || TaskError::invalid_data(format!("malformed task id: {:?}", s));
        let value = s.parse::<u64>().map_err(|_| malformed())?;
        if value.to_string() != s {
            return Err(malformed());
        }
        Ok(Self(value))
    }
}

impl TaskKey for SequentialId {
    const FIELD: &'static str = "id";
}

/// 12-byte ObjectId assigned by the document store at insert time.
///
/// Serialized as a 24-character lowercase hex string, not as extended JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(ObjectId);

impl DocumentId {
    pub fn object_id(&self) -> ObjectId {
        self.0
    }
}

impl From<ObjectId> for DocumentId {
    fn from(oid: ObjectId) -> Self {
        Self(oid)
    }
}

impl Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_hex())
    }
}

impl FromStr for DocumentId {
    type Err = oid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ObjectId::parse_str(s).map(Self)
    }
}

impl Serialize for DocumentId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_hex())
    }
}

impl TaskKey for DocumentId {
    const FIELD: &'static str = "_id";
}

/// A single task.
#[derive(Debug, Clone, PartialEq)]
pub struct Task<I> {
    pub id: I,
    pub completed: bool,
    pub description: String,
}

impl<I> Task<I> {
    /// New tasks always start out incomplete
    pub fn new(id: I, description: impl Into<String>) -> Self {
        Self {
            id,
            completed: false,
            description: description.into(),
        }
    }

    /// One-way flip; there is no way back to incomplete
    pub fn mark_completed(&mut self) {
        self.completed = true;
    }
}

impl<I: TaskKey> Serialize for Task<I> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Task", 3)?;
        state.serialize_field(I::FIELD, &self.id)?;
        state.serialize_field("completed", &self.completed)?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}
