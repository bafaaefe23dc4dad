use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A node of the connector flow, as reported by the flow runtime.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Node {
    #[serde(rename = "type")]
    pub node_type: String,
    pub name: String,
}

/// The flow message captured at a node. Routing metadata added by the flow runtime
/// (`_msgid`, `_firstnode`, ...) is accepted but not stored.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub payload: Value,
    pub topic: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Snapshot {
    pub id: String,
    pub transaction: String,
    pub node: Node,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    pub msg: Message,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Step {
    pub id: String,
    pub topic: String,
    pub node: Node,
    pub transaction: String,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
    #[serde(rename = "snapshotId")]
    pub snapshot_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Log {
    pub id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Transaction {
    pub id: String,
    pub start: i64,
    pub end: i64,
    pub receiver: Vec<String>,
    pub sender: String,
    #[serde(default)]
    pub logs: Vec<Log>,
}
