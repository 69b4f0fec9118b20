//! External sign-off for zone creation.
//!
//! Before a zone is committed the registry sends one [`ApprovalRequest`] per creation
//! attempt to an [`ApprovalService`]. The request carries a display name, description,
//! a placeholder image, the requesting actor's id and the candidate zone id as a tagged
//! attribute. Only an explicit approval lets the zone through.
mod client;

use futures::future::BoxFuture;
use serde::Serialize;
use crate::zone::{Actor, ZoneId};

pub use client::HttpApprovalService;

const PLACEHOLDER_IMAGE: &str = "https://placehold.co/512x512?text=";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApprovalError {
    /// The service answered, but not with an approval.
    #[error("{0}")]
    Rejected(String),

    /// The service could not be reached or did not answer in time.
    #[error("{0}")]
    Unavailable(String),
}

/// Decides whether a candidate zone may be created.
///
/// Implementations must be `Send + Sync`; the registry awaits the returned future
/// without holding any lock.
pub trait ApprovalService: Send + Sync {
    fn approve<'a>(&'a self, request: &'a ApprovalRequest) -> BoxFuture<'a, Result<(), ApprovalError>>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    pub trait_type: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemMetadata {
    pub name: String,
    pub description: String,
    pub image: String,
    pub external_url: Option<String>,
    pub attributes: Vec<Attribute>,
}

/// Payload describing one candidate zone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApprovalRequest {
    pub game_id: u32,
    pub collection_id: u32,
    pub metadata: ItemMetadata,
    pub player_id: String,
    pub player_address: Option<String>,
}

impl ApprovalRequest {
    pub fn for_zone(zone_name: &str, actor: &Actor, zone_id: ZoneId) -> Self {
        Self {
            game_id: 1,
            collection_id: 1,
            metadata: ItemMetadata {
                name: zone_name.to_string(),
                description: format!("Private zone of player {}", actor.name),
                image: format!("{PLACEHOLDER_IMAGE}{}", zone_name.replace(' ', "+")),
                external_url: None,
                attributes: vec![Attribute {
                    trait_type: "uuid".to_string(),
                    value: zone_id.to_string(),
                }],
            },
            player_id: actor.id.clone(),
            player_address: None,
        }
    }

    pub fn with_collection(mut self, game_id: u32, collection_id: u32) -> Self {
        self.game_id = game_id;
        self.collection_id = collection_id;
        self
    }
}
