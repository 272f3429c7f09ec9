//! The property contract and runtime type tokens.
//!
//! A property is a typed, keyed, optionally-valued unit of metadata. The
//! [`Property`] trait is the minimal shape any storable property must satisfy;
//! [`AnyProperty`] is the type-erased facade the carrier hands out when a
//! query spans more than one concrete property type.

use std::any::{Any, TypeId, type_name};
use std::fmt;
use std::hash::{Hash, Hasher};

/// The contract every storable property satisfies.
///
/// A property is identified by its concrete type together with its key. The
/// key is fixed at construction; the value may be absent, which is a normal,
/// representable state rather than an error.
///
/// `update` mutates the value in place and hands back the same logical
/// property, so call chains observe one handle rather than a copy. The value
/// type is fixed per implementation through the `Value` associated type, which
/// makes a mismatched update unrepresentable.
///
/// # Example
///
/// ```rust
/// use datacarrier::Property;
/// use datacarrier::properties::IntegerProperty;
///
/// let mut age = IntegerProperty::new(String::from("age"), 41);
/// assert_eq!(age.value(), Some(&41));
///
/// age.update(42);
/// assert_eq!(age.value(), Some(&42));
/// ```
pub trait Property: Any + fmt::Debug {
    /// Identity component, compared by equality. Stable for the life of the
    /// property.
    type Key: PartialEq + fmt::Debug;

    /// Payload type, fixed per concrete property type.
    type Value;

    /// Returns the identity key.
    fn key(&self) -> &Self::Key;

    /// Returns the current value, or `None` if the property holds no value.
    fn value(&self) -> Option<&Self::Value>;

    /// Replaces the value with `Some(value)` and returns the same property.
    fn update(&mut self, value: Self::Value) -> &mut Self;
}

/// A runtime token identifying a concrete property type.
///
/// Equality and hashing consider only the underlying [`TypeId`]; the type
/// name is carried for diagnostics and display.
#[derive(Debug, Clone, Copy)]
pub struct PropertyType {
    id: TypeId,
    name: &'static str,
}

impl PropertyType {
    /// Returns the token for the concrete property type `P`.
    pub fn of<P: Property>() -> Self {
        Self {
            id: TypeId::of::<P>(),
            name: type_name::<P>(),
        }
    }

    /// Returns the full name of the property type.
    ///
    /// Diagnostic only; the name is not guaranteed unique across builds,
    /// unlike the token's identity.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl PartialEq for PropertyType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for PropertyType {}

impl Hash for PropertyType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Type-erased view of a stored property.
///
/// Implemented for every [`Property`]; used where a query spans property
/// types and no single concrete type applies. The concrete type is recovered
/// at the call site through [`AnyProperty::as_any`]:
///
/// ```rust
/// use datacarrier::{AnyProperty, DataCarrier, Property};
/// use datacarrier::properties::CharProperty;
///
/// let mut carrier = DataCarrier::new();
/// carrier.store(CharProperty::new(String::from("initial"), 'j'));
///
/// for property in carrier.properties() {
///     if let Some(ch) = property.as_any().downcast_ref::<CharProperty<String>>() {
///         assert_eq!(ch.key(), "initial");
///     }
/// }
/// ```
pub trait AnyProperty: Any + fmt::Debug {
    /// Returns the token for this property's concrete type.
    fn property_type(&self) -> PropertyType;

    /// Upcasts to [`Any`] for checked recovery of the concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Mutable counterpart of [`AnyProperty::as_any`].
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<P: Property> AnyProperty for P {
    fn property_type(&self) -> PropertyType {
        PropertyType::of::<P>()
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
