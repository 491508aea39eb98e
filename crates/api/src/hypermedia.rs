//! HAL-style resource envelopes and the assembler that links entities.
//!
//! An item renders as the entity's own fields plus `_links`; a collection
//! renders its items under `_embedded.<collection>` and carries a single
//! collection-level `self` link.

use std::marker::PhantomData;

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use common::EntityId;
use domain::Entity;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

/// Relation name of a resource's canonical location.
pub const SELF_REL: &str = "self";

/// Media type of every envelope response.
pub const HAL_JSON: &str = "application/hal+json";

/// A navigation link target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub href: String,
}

/// Named links in insertion order, rendered as a JSON object keyed by relation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Links(Vec<(String, Link)>);

impl Links {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a link under `rel`.
    pub fn with(mut self, rel: impl Into<String>, href: impl Into<String>) -> Self {
        self.0.push((rel.into(), Link { href: href.into() }));
        self
    }

    pub fn get(&self, rel: &str) -> Option<&Link> {
        self.0.iter().find(|(r, _)| r == rel).map(|(_, link)| link)
    }

    /// Returns the href of the `self` link.
    pub fn self_href(&self) -> Option<&str> {
        self.get(SELF_REL).map(|link| link.href.as_str())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn rels(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(rel, _)| rel.as_str())
    }
}

impl Serialize for Links {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (rel, link) in &self.0 {
            map.serialize_entry(rel, link)?;
        }
        map.end()
    }
}

/// A single entity together with its links.
#[derive(Debug, Clone, Serialize)]
pub struct EntityModel<T> {
    #[serde(flatten)]
    pub content: T,
    #[serde(rename = "_links")]
    pub links: Links,
}

/// A collection of linked entities with collection-level links.
#[derive(Debug, Clone)]
pub struct CollectionModel<T> {
    pub items: Vec<EntityModel<T>>,
    pub links: Links,
}

impl<T: Entity> Serialize for CollectionModel<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("_embedded", &Embedded(&self.items))?;
        map.serialize_entry("_links", &self.links)?;
        map.end()
    }
}

struct Embedded<'a, T>(&'a [EntityModel<T>]);

impl<T: Entity> Serialize for Embedded<'_, T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(T::COLLECTION, self.0)?;
        map.end()
    }
}

/// A representation carrying links only, such as the API root.
#[derive(Debug, Clone, Serialize)]
pub struct LinksModel {
    #[serde(rename = "_links")]
    pub links: Links,
}

/// Wraps entities of one type into linked envelopes.
///
/// Every item gets exactly a `self` link (`{base}/{collection}/{id}`) followed
/// by a link back to its collection (`{base}/{collection}`), whether it is
/// returned alone or inside a collection.
pub struct ResourceAssembler<E> {
    base_url: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ResourceAssembler<E> {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> ResourceAssembler<E> {
    /// Creates an assembler prefixing every href with `base_url`.
    ///
    /// An empty base URL yields root-relative links such as `/employees/1`.
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            _entity: PhantomData,
        }
    }

    pub fn collection_href(&self) -> String {
        format!("{}/{}", self.base_url, E::COLLECTION)
    }

    pub fn item_href(&self, id: EntityId) -> String {
        format!("{}/{}/{id}", self.base_url, E::COLLECTION)
    }

    /// Wraps a stored entity with its `self` and collection links.
    pub fn to_model(&self, entity: E) -> EntityModel<E> {
        let self_href = match entity.id() {
            Some(id) => self.item_href(id),
            None => {
                tracing::warn!(resource = E::COLLECTION, "linking entity without identifier");
                self.collection_href()
            }
        };

        EntityModel {
            links: Links::new()
                .with(SELF_REL, self_href)
                .with(E::COLLECTION, self.collection_href()),
            content: entity,
        }
    }

    /// Wraps entities into a collection whose only link is its own `self`.
    pub fn to_collection(&self, entities: impl IntoIterator<Item = E>) -> CollectionModel<E> {
        CollectionModel {
            items: entities.into_iter().map(|e| self.to_model(e)).collect(),
            links: Links::new().with(SELF_REL, self.collection_href()),
        }
    }
}

/// JSON response body with the HAL media type.
pub struct Hal<T>(pub T);

impl<T: Serialize> IntoResponse for Hal<T> {
    fn into_response(self) -> Response {
        match serde_json::to_vec(&self.0) {
            Ok(body) => (
                [(header::CONTENT_TYPE, HeaderValue::from_static(HAL_JSON))],
                body,
            )
                .into_response(),
            Err(err) => {
                tracing::error!(error = %err, "failed to serialize response body");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
            }
        }
    }
}
