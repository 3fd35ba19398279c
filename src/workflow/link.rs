use serde::de::Deserializer;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

use super::{LinkId, NodeId, SlotIndex};

/// The canonical in-memory representation of a data edge.
///
/// The wire format allows two encodings per link: the positional 6-tuple
/// `[id, origin_id, origin_slot, target_id, target_slot, type]` and an
/// equivalent field object. Both are accepted on ingest; serialization
/// always emits the tuple form, which is what the majority of producers
/// write.
#[derive(Debug, Clone, PartialEq)]
pub struct Link {
    pub id: LinkId,
    pub origin_id: NodeId,
    pub origin_slot: SlotIndex,
    pub target_id: NodeId,
    pub target_slot: SlotIndex,
    /// Data type tag; a string for most producers but left untyped because
    /// numeric tags appear in older documents.
    pub link_type: serde_json::Value,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LinkRepr {
    Tuple(
        LinkId,
        NodeId,
        SlotIndex,
        NodeId,
        SlotIndex,
        serde_json::Value,
    ),
    Object {
        id: LinkId,
        #[serde(alias = "origin")]
        origin_id: NodeId,
        #[serde(default)]
        origin_slot: SlotIndex,
        #[serde(alias = "target")]
        target_id: NodeId,
        #[serde(default)]
        target_slot: SlotIndex,
        #[serde(rename = "type", default)]
        link_type: serde_json::Value,
    },
}

impl<'de> Deserialize<'de> for Link {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match LinkRepr::deserialize(deserializer)? {
            LinkRepr::Tuple(id, origin_id, origin_slot, target_id, target_slot, link_type) => {
                Ok(Link {
                    id,
                    origin_id,
                    origin_slot,
                    target_id,
                    target_slot,
                    link_type,
                })
            }
            LinkRepr::Object {
                id,
                origin_id,
                origin_slot,
                target_id,
                target_slot,
                link_type,
            } => Ok(Link {
                id,
                origin_id,
                origin_slot,
                target_id,
                target_slot,
                link_type,
            }),
        }
    }
}

impl Serialize for Link {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        (
            self.id,
            self.origin_id,
            self.origin_slot,
            self.target_id,
            self.target_slot,
            &self.link_type,
        )
            .serialize(serializer)
    }
}
