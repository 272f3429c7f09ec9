//! # datacarrier
//!
//! In-memory typed property storage for attaching heterogeneous metadata to
//! host objects.
//!
//! A [`DataCarrier`] holds strongly-typed key/value pairs ("properties"),
//! grouped by their concrete property type. Hosts attach metadata without
//! knowing every property type in advance; every later operation (lookup,
//! update, deletion, bulk queries) resolves against the concrete type plus
//! the key.
//!
//! ## Features
//!
//! - **Type-safe retrieval**: queries are parameterized by the concrete
//!   property type; no unchecked casts anywhere in the API
//! - **Per-type key uniqueness**: storing a duplicate `(type, key)` pair is
//!   rejected rather than silently overwritten
//! - **Stable ordering**: insertion order is preserved within each type
//! - **Explicit absence**: singular queries return [`Option`], plural queries
//!   return empty collections, never an ambiguous sentinel
//! - **Bring your own types**: anything implementing [`Property`] can be
//!   stored; common payloads ship in [`properties`]
//!
//! ## Quick Start
//!
//! ```rust
//! use datacarrier::{DataCarrier, Property};
//! use datacarrier::properties::{CharProperty, DoubleProperty};
//!
//! let mut carrier = DataCarrier::new();
//!
//! carrier.store(CharProperty::new(String::from("grade"), 'a'));
//! carrier.store(DoubleProperty::new(String::from("score"), 98.6));
//!
//! // Duplicate (type, key) pairs are rejected.
//! assert!(!carrier.store(CharProperty::new(String::from("grade"), 'b')));
//!
//! // Typed lookup by key.
//! let grade = carrier.property::<CharProperty<String>>(&String::from("grade"));
//! assert_eq!(grade.and_then(CharProperty::value), Some(&'a'));
//!
//! // Update in place, through the carrier.
//! assert!(carrier.update_property::<CharProperty<String>>(&String::from("grade"), 'c'));
//!
//! // Same key under a different type is an independent property.
//! assert!(!carrier.contains::<DoubleProperty<String>>(&String::from("grade")));
//!
//! assert_eq!(carrier.len(), 2);
//! carrier.clear();
//! assert!(carrier.is_empty());
//! ```
//!
//! ## Architecture
//!
//! The carrier keeps one homogeneous bucket per concrete property type,
//! registered under the type's `TypeId` and reached through a generic facade.
//! Keyed operations scan the relevant bucket linearly, which fits the
//! intended scale: metadata attached to a single host object, not a bulk
//! data store. The carrier is single-owner and synchronous; callers that
//! share one across threads wrap it in their own lock.

#![deny(missing_docs)]
#![deny(clippy::all, clippy::pedantic)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::return_self_not_must_use
)]

pub mod carrier;
pub mod properties;
pub mod property;

pub use carrier::DataCarrier;
pub use property::{AnyProperty, Property, PropertyType};
