//! The carrier: a registry of typed property buckets behind a generic facade.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::mem;

use crate::property::{AnyProperty, Property, PropertyType};

/// Homogeneous storage for one concrete property type, in insertion order.
struct Bucket<P: Property> {
    entries: Vec<P>,
}

impl<P: Property> Bucket<P> {
    fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: Vec::with_capacity(capacity),
        }
    }

    fn position(&self, key: &P::Key) -> Option<usize> {
        self.entries.iter().position(|entry| entry.key() == key)
    }
}

/// Type-erased bucket surface; the carrier recovers the concrete bucket
/// through a checked downcast keyed by the same `TypeId` it was registered
/// under.
trait AnyBucket: Any {
    fn property_type(&self) -> PropertyType;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool;
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
    fn iter_any(&self) -> Box<dyn Iterator<Item = &dyn AnyProperty> + '_>;
}

impl<P: Property> AnyBucket for Bucket<P> {
    fn property_type(&self) -> PropertyType {
        PropertyType::of::<P>()
    }

    fn len(&self) -> usize {
        self.entries.len()
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn iter_any(&self) -> Box<dyn Iterator<Item = &dyn AnyProperty> + '_> {
        Box::new(self.entries.iter().map(|entry| entry as &dyn AnyProperty))
    }
}

/// An in-memory store of heterogeneous, strongly-typed properties.
///
/// Properties are grouped by their concrete type; within one type, keys are
/// unique and insertion order is preserved. Two different property types may
/// use equal keys independently. Lookups are parameterized by the concrete
/// property type, so a query for one type never observes another, even on key
/// collisions.
///
/// Not-found is never an error: singular queries return [`Option`], plural
/// queries return empty collections. Storing a duplicate `(type, key)` pair
/// is rejected with `false` rather than overwriting.
///
/// The carrier owns its properties. Mutation goes through the carrier
/// ([`update_property`](Self::update_property),
/// [`property_mut`](Self::property_mut)); changing a property's key through
/// that access breaks the index and is the caller's responsibility to avoid.
///
/// # Example
///
/// ```rust
/// use datacarrier::{DataCarrier, Property};
/// use datacarrier::properties::{CharProperty, DoubleProperty};
///
/// let mut carrier = DataCarrier::new();
/// assert!(carrier.store(CharProperty::new(String::from("grade"), 'a')));
/// assert!(carrier.store(DoubleProperty::new(String::from("score"), 98.6)));
///
/// // Same type + same key is rejected; the stored property is untouched.
/// assert!(!carrier.store(CharProperty::new(String::from("grade"), 'b')));
///
/// let grade = carrier.property::<CharProperty<String>>(&String::from("grade"));
/// assert_eq!(grade.and_then(CharProperty::value), Some(&'a'));
/// assert_eq!(carrier.len(), 2);
/// ```
pub struct DataCarrier {
    /// Buckets in first-seen type order; drives deterministic iteration.
    buckets: Vec<Box<dyn AnyBucket>>,
    /// Concrete property type to bucket slot.
    index: HashMap<TypeId, usize>,
    /// Capacity hint applied to each newly registered bucket.
    bucket_capacity: usize,
}

impl DataCarrier {
    /// Creates an empty carrier.
    pub fn new() -> Self {
        Self {
            buckets: Vec::new(),
            index: HashMap::new(),
            bucket_capacity: 0,
        }
    }

    /// Creates an empty carrier with capacity hints.
    ///
    /// `expected_types` pre-sizes the type registry; `expected_per_type`
    /// pre-sizes each bucket as it is registered. Purely an allocation hint;
    /// behavior is identical to [`DataCarrier::new`].
    pub fn with_capacity(expected_types: usize, expected_per_type: usize) -> Self {
        Self {
            buckets: Vec::with_capacity(expected_types),
            index: HashMap::with_capacity(expected_types),
            bucket_capacity: expected_per_type,
        }
    }

    fn bucket<P: Property>(&self) -> Option<&Bucket<P>> {
        self.index.get(&TypeId::of::<P>()).map(|&slot| {
            self.buckets[slot]
                .as_any()
                .downcast_ref::<Bucket<P>>()
                .expect("bucket registered under a foreign TypeId")
        })
    }

    fn bucket_mut<P: Property>(&mut self) -> Option<&mut Bucket<P>> {
        let slot = *self.index.get(&TypeId::of::<P>())?;
        Some(
            self.buckets[slot]
                .as_any_mut()
                .downcast_mut::<Bucket<P>>()
                .expect("bucket registered under a foreign TypeId"),
        )
    }

    /// Returns `P`'s bucket, registering an empty one first if the type has
    /// never been seen.
    fn bucket_mut_or_register<P: Property>(&mut self) -> &mut Bucket<P> {
        let slot = match self.index.get(&TypeId::of::<P>()) {
            Some(&slot) => slot,
            None => {
                let slot = self.buckets.len();
                self.buckets
                    .push(Box::new(Bucket::<P>::with_capacity(self.bucket_capacity)));
                self.index.insert(TypeId::of::<P>(), slot);
                slot
            }
        };

        self.buckets[slot]
            .as_any_mut()
            .downcast_mut::<Bucket<P>>()
            .expect("bucket registered under a foreign TypeId")
    }

    /// Stores a property.
    ///
    /// Returns `false` and leaves the carrier unchanged if a property of the
    /// same concrete type with an equal key is already stored. Otherwise the
    /// property is appended to its type's bucket and `true` is returned.
    pub fn store<P: Property>(&mut self, property: P) -> bool {
        if self.contains::<P>(property.key()) {
            #[cfg(feature = "logging")]
            log::trace!(
                "store rejected, duplicate key {:?} for {}",
                property.key(),
                PropertyType::of::<P>()
            );
            return false;
        }

        self.bucket_mut_or_register::<P>().entries.push(property);
        true
    }

    /// Returns all stored properties across all types.
    ///
    /// Order is per-type insertion order, with types in the order they were
    /// first stored.
    pub fn properties(&self) -> impl Iterator<Item = &dyn AnyProperty> + '_ {
        self.buckets.iter().flat_map(|bucket| bucket.iter_any())
    }

    /// Returns the distinct property types currently holding at least one
    /// property.
    pub fn property_types(&self) -> impl Iterator<Item = PropertyType> + '_ {
        self.buckets
            .iter()
            .filter(|bucket| !bucket.is_empty())
            .map(|bucket| bucket.property_type())
    }

    /// Returns the property of type `P` with an equal key.
    ///
    /// `None` if the type is unknown to the carrier or no key matches.
    pub fn property<P: Property>(&self, key: &P::Key) -> Option<&P> {
        self.bucket::<P>()?
            .entries
            .iter()
            .find(|entry| entry.key() == key)
    }

    /// Mutable counterpart of [`property`](Self::property).
    ///
    /// This is the carrier-mediated way to mutate a stored property beyond
    /// [`update_property`](Self::update_property).
    pub fn property_mut<P: Property>(&mut self, key: &P::Key) -> Option<&mut P> {
        self.bucket_mut::<P>()?
            .entries
            .iter_mut()
            .find(|entry| entry.key() == key)
    }

    /// Returns the first-stored property of type `P`, if any.
    pub fn first_property<P: Property>(&self) -> Option<&P> {
        self.bucket::<P>()?.entries.first()
    }

    /// Returns all properties of type `P` in insertion order.
    ///
    /// Empty slice, never `None`, when the type holds nothing: plural
    /// queries return empty collections, singular queries return options.
    pub fn properties_of<P: Property>(&self) -> &[P] {
        self.bucket::<P>()
            .map_or(&[], |bucket| bucket.entries.as_slice())
    }

    /// Returns `true` if at least one property of type `P` is stored,
    /// independent of key.
    pub fn contains_type<P: Property>(&self) -> bool {
        self.bucket::<P>()
            .is_some_and(|bucket| !bucket.entries.is_empty())
    }

    /// Returns `true` if a property of type `P` with an equal key is stored.
    pub fn contains<P: Property>(&self, key: &P::Key) -> bool {
        self.property::<P>(key).is_some()
    }

    /// Removes and returns the property of type `P` with an equal key.
    ///
    /// `None`, with no change, if there is no match. Remaining properties of
    /// the type keep their relative order.
    pub fn delete_property<P: Property>(&mut self, key: &P::Key) -> Option<P> {
        let bucket = self.bucket_mut::<P>()?;
        let slot = bucket.position(key)?;
        Some(bucket.entries.remove(slot))
    }

    /// Removes and returns the stored property matching `property`'s type and
    /// key.
    ///
    /// Equivalent to [`delete_property`](Self::delete_property) with
    /// `property.key()`; the stored instance is returned, which need not
    /// compare equal to `property` beyond its identity.
    pub fn delete_matching<P: Property>(&mut self, property: &P) -> Option<P> {
        self.delete_property::<P>(property.key())
    }

    /// Removes and returns all properties of type `P`.
    ///
    /// `None` if the carrier has never stored this type. If the type was
    /// stored before but is currently empty, an empty `Vec` is returned:
    /// "nothing to delete because the type is unknown" and "the type existed
    /// but was already emptied" are distinct outcomes.
    pub fn delete_properties<P: Property>(&mut self) -> Option<Vec<P>> {
        let bucket = self.bucket_mut::<P>()?;
        let drained = mem::take(&mut bucket.entries);

        #[cfg(feature = "logging")]
        log::debug!(
            "deleted {} properties of {}",
            drained.len(),
            PropertyType::of::<P>()
        );

        Some(drained)
    }

    /// Updates the value of the property of type `P` with an equal key.
    ///
    /// Returns `false` if there is no match; otherwise the property's
    /// [`update`](Property::update) runs in place and `true` is returned.
    pub fn update_property<P: Property>(&mut self, key: &P::Key, value: P::Value) -> bool {
        match self.property_mut::<P>(key) {
            Some(property) => {
                property.update(value);
                true
            }
            None => false,
        }
    }

    /// Returns the total number of stored properties across all types.
    pub fn len(&self) -> usize {
        self.buckets.iter().map(|bucket| bucket.len()).sum()
    }

    /// Returns `true` if the carrier holds no properties.
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(|bucket| bucket.is_empty())
    }

    /// Removes every stored property and forgets all registered types.
    pub fn clear(&mut self) {
        #[cfg(feature = "logging")]
        log::debug!("clearing {} properties", self.len());

        self.buckets.clear();
        self.index.clear();
    }
}

impl Default for DataCarrier {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for DataCarrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.buckets
                    .iter()
                    .map(|bucket| (bucket.property_type().name(), bucket.len())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::{CharProperty, DoubleProperty, IntegerProperty};

    fn key(name: &str) -> String {
        String::from(name)
    }

    #[test]
    fn test_store_registers_bucket_once() {
        let mut carrier = DataCarrier::new();

        assert!(carrier.store(CharProperty::new(key("a"), 'a')));
        assert!(carrier.store(CharProperty::new(key("b"), 'b')));

        assert_eq!(carrier.property_types().count(), 1);
        assert_eq!(carrier.len(), 2);
    }

    #[test]
    fn test_duplicate_store_keeps_first() {
        let mut carrier = DataCarrier::new();

        assert!(carrier.store(CharProperty::new(key("x"), 'a')));
        assert!(!carrier.store(CharProperty::new(key("x"), 'b')));

        let stored = carrier.property::<CharProperty<String>>(&key("x")).unwrap();
        assert_eq!(stored.value(), Some(&'a'));
        assert_eq!(carrier.len(), 1);
    }

    #[test]
    fn test_lookup_never_crosses_types() {
        let mut carrier = DataCarrier::new();

        carrier.store(CharProperty::new(key("shared"), 'a'));
        carrier.store(DoubleProperty::new(key("shared"), 1.5));

        assert_eq!(carrier.len(), 2);
        assert!(carrier.contains::<CharProperty<String>>(&key("shared")));
        assert!(carrier.contains::<DoubleProperty<String>>(&key("shared")));
        assert!(!carrier.contains::<IntegerProperty<String>>(&key("shared")));
    }

    #[test]
    fn test_emptied_bucket_stays_registered() {
        let mut carrier = DataCarrier::new();

        carrier.store(CharProperty::new(key("x"), 'a'));
        carrier.delete_property::<CharProperty<String>>(&key("x"));

        // The type is known but holds nothing: invisible to type queries,
        // still distinguishable through delete_properties.
        assert!(!carrier.contains_type::<CharProperty<String>>());
        assert_eq!(carrier.property_types().count(), 0);
        assert_eq!(carrier.delete_properties::<CharProperty<String>>(), Some(Vec::new()));
        assert_eq!(carrier.delete_properties::<DoubleProperty<String>>(), None);
    }

    #[test]
    fn test_clear_forgets_registered_types() {
        let mut carrier = DataCarrier::new();

        carrier.store(CharProperty::new(key("x"), 'a'));
        carrier.clear();

        assert_eq!(carrier.len(), 0);
        assert!(carrier.is_empty());
        assert_eq!(carrier.delete_properties::<CharProperty<String>>(), None);
    }

    #[test]
    fn test_properties_iterates_type_then_insertion_order() {
        let mut carrier = DataCarrier::new();

        carrier.store(CharProperty::new(key("c1"), 'a'));
        carrier.store(DoubleProperty::new(key("d1"), 1.0));
        carrier.store(CharProperty::new(key("c2"), 'b'));

        let types: Vec<_> = carrier
            .properties()
            .map(|property| property.property_type())
            .collect();

        assert_eq!(
            types,
            vec![
                PropertyType::of::<CharProperty<String>>(),
                PropertyType::of::<CharProperty<String>>(),
                PropertyType::of::<DoubleProperty<String>>(),
            ]
        );
    }

    #[test]
    fn test_debug_lists_buckets() {
        let mut carrier = DataCarrier::new();
        carrier.store(CharProperty::new(key("x"), 'a'));

        let rendered = format!("{carrier:?}");
        assert!(rendered.contains("CharProperty"));
        assert!(rendered.contains('1'));
    }
}
