//! SameValueZero: the equivalence used to match stored keys and values.
//!
//! Equal for all values of the same shape, except that every NaN equals every
//! other NaN and `+0.0` equals `-0.0`. Rust's `PartialEq` on floats differs on
//! both counts, so matching never goes through `==` directly.
//!
//! Implementations must keep `hash_value_zero` consistent with
//! `same_value_zero`: two values that compare equal must feed identical bytes
//! to the hasher.

use core::hash::{Hash, Hasher};
use std::rc::Rc;
use std::sync::Arc;

pub trait SameValueZero {
    /// Returns true if `self` and `other` are the same value under SameValueZero.
    fn same_value_zero(&self, other: &Self) -> bool;

    /// Feeds a hash of `self` consistent with [`SameValueZero::same_value_zero`].
    fn hash_value_zero<H: Hasher>(&self, state: &mut H);
}

macro_rules! via_eq {
    ($($t:ty),* $(,)?) => {
        $(
            impl SameValueZero for $t {
                #[inline]
                fn same_value_zero(&self, other: &Self) -> bool {
                    self == other
                }
                #[inline]
                fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
                    self.hash(state);
                }
            }
        )*
    };
}

via_eq!(
    (),
    bool,
    char,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    str,
    String,
);

/// Bit pattern that stands for `x` under SameValueZero.
#[inline]
fn canonical_f64_bits(x: f64) -> u64 {
    if x.is_nan() {
        f64::NAN.to_bits()
    } else if x == 0.0 {
        0
    } else {
        x.to_bits()
    }
}

impl SameValueZero for f64 {
    #[inline]
    fn same_value_zero(&self, other: &Self) -> bool {
        if self.is_nan() {
            return other.is_nan();
        }
        // `==` already treats +0.0 and -0.0 as equal.
        self == other
    }
    #[inline]
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        canonical_f64_bits(*self).hash(state);
    }
}

impl SameValueZero for f32 {
    #[inline]
    fn same_value_zero(&self, other: &Self) -> bool {
        f64::from(*self).same_value_zero(&f64::from(*other))
    }
    #[inline]
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        f64::from(*self).hash_value_zero(state);
    }
}

impl<T: SameValueZero + ?Sized> SameValueZero for &T {
    #[inline]
    fn same_value_zero(&self, other: &Self) -> bool {
        (**self).same_value_zero(*other)
    }
    #[inline]
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        (**self).hash_value_zero(state);
    }
}

macro_rules! via_deref {
    ($($p:ident),*) => {
        $(
            impl<T: SameValueZero + ?Sized> SameValueZero for $p<T> {
                #[inline]
                fn same_value_zero(&self, other: &Self) -> bool {
                    (**self).same_value_zero(&**other)
                }
                #[inline]
                fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
                    (**self).hash_value_zero(state);
                }
            }
        )*
    };
}

via_deref!(Box, Rc, Arc);

impl<T: SameValueZero> SameValueZero for Option<T> {
    fn same_value_zero(&self, other: &Self) -> bool {
        match (self, other) {
            (Some(a), Some(b)) => a.same_value_zero(b),
            (None, None) => true,
            _ => false,
        }
    }
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        match self {
            Some(v) => {
                state.write_u8(1);
                v.hash_value_zero(state);
            }
            None => state.write_u8(0),
        }
    }
}

impl<T: SameValueZero> SameValueZero for [T] {
    fn same_value_zero(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.same_value_zero(b))
    }
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        for v in self {
            v.hash_value_zero(state);
        }
    }
}

impl<T: SameValueZero> SameValueZero for Vec<T> {
    #[inline]
    fn same_value_zero(&self, other: &Self) -> bool {
        self.as_slice().same_value_zero(other.as_slice())
    }
    #[inline]
    fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
        self.as_slice().hash_value_zero(state);
    }
}

macro_rules! tuple {
    ($($name:ident . $idx:tt),+) => {
        impl<$($name: SameValueZero),+> SameValueZero for ($($name,)+) {
            fn same_value_zero(&self, other: &Self) -> bool {
                $(self.$idx.same_value_zero(&other.$idx))&&+
            }
            fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
                $(self.$idx.hash_value_zero(state);)+
            }
        }
    };
}

tuple!(A.0);
tuple!(A.0, B.1);
tuple!(A.0, B.1, C.2);
tuple!(A.0, B.1, C.2, D.3);

#[cfg(feature = "json")]
mod json {
    use super::SameValueZero;
    use core::hash::{Hash, Hasher};
    use serde_json::{Number, Value};

    // JSON numbers follow the host number model: compare as f64.
    fn number_eq(a: &Number, b: &Number) -> bool {
        match (a.as_f64(), b.as_f64()) {
            (Some(x), Some(y)) => x.same_value_zero(&y),
            _ => a == b,
        }
    }

    fn hash_number<H: Hasher>(n: &Number, state: &mut H) {
        match n.as_f64() {
            Some(x) => x.hash_value_zero(state),
            None => n.to_string().hash(state),
        }
    }

    impl SameValueZero for Value {
        fn same_value_zero(&self, other: &Self) -> bool {
            match (self, other) {
                (Value::Null, Value::Null) => true,
                (Value::Bool(a), Value::Bool(b)) => a == b,
                (Value::Number(a), Value::Number(b)) => number_eq(a, b),
                (Value::String(a), Value::String(b)) => a == b,
                (Value::Array(a), Value::Array(b)) => a.as_slice().same_value_zero(b.as_slice()),
                (Value::Object(a), Value::Object(b)) => {
                    a.len() == b.len()
                        && a.iter()
                            .all(|(k, v)| b.get(k).is_some_and(|w| v.same_value_zero(w)))
                }
                _ => false,
            }
        }

        fn hash_value_zero<H: Hasher>(&self, state: &mut H) {
            match self {
                Value::Null => state.write_u8(0),
                Value::Bool(b) => {
                    state.write_u8(1);
                    b.hash(state);
                }
                Value::Number(n) => {
                    state.write_u8(2);
                    hash_number(n, state);
                }
                Value::String(s) => {
                    state.write_u8(3);
                    s.hash(state);
                }
                Value::Array(a) => {
                    state.write_u8(4);
                    a.as_slice().hash_value_zero(state);
                }
                Value::Object(o) => {
                    // Iteration order depends on serde_json features; sort by key.
                    state.write_u8(5);
                    state.write_usize(o.len());
                    let mut fields: Vec<(&String, &Value)> = o.iter().collect();
                    fields.sort_unstable_by(|a, b| a.0.cmp(b.0));
                    for (k, v) in fields {
                        k.hash(state);
                        v.hash_value_zero(state);
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::SameValueZero;
    use std::collections::hash_map::RandomState;
    use std::hash::BuildHasher;

    fn h<T: SameValueZero + ?Sized>(s: &RandomState, v: &T) -> u64 {
        let mut st = s.build_hasher();
        v.hash_value_zero(&mut st);
        core::hash::Hasher::finish(&st)
    }

    /// Invariant: NaN is SameValueZero-equal to itself and to NaNs with other payloads.
    #[test]
    fn nan_equals_nan() {
        let other_nan = f64::from_bits(f64::NAN.to_bits() | 1);
        assert!(other_nan.is_nan());
        assert!(f64::NAN.same_value_zero(&f64::NAN));
        assert!(f64::NAN.same_value_zero(&other_nan));
        let s = RandomState::new();
        assert_eq!(h(&s, &f64::NAN), h(&s, &other_nan));
        assert!(!f64::NAN.same_value_zero(&0.0));
    }

    /// Invariant: +0 and -0 are equal and hash identically.
    #[test]
    fn signed_zeros_are_equal() {
        assert!(0.0f64.same_value_zero(&-0.0));
        assert!((-0.0f32).same_value_zero(&0.0));
        let s = RandomState::new();
        assert_eq!(h(&s, &0.0f64), h(&s, &-0.0f64));
        assert_eq!(h(&s, &0.0f32), h(&s, &-0.0f32));
    }

    #[test]
    fn ordinary_values_follow_eq() {
        assert!(1u32.same_value_zero(&1));
        assert!(!1u32.same_value_zero(&2));
        assert!("a".same_value_zero(&"a"));
        assert!(String::from("x").same_value_zero(&String::from("x")));
        assert!(Some(f64::NAN).same_value_zero(&Some(f64::NAN)));
        assert!(!Some(1).same_value_zero(&None));
        assert!(vec![0.0, f64::NAN].same_value_zero(&vec![-0.0, f64::NAN]));
        assert!(!vec![1].same_value_zero(&vec![1, 2]));
        assert!((1, -0.0f64).same_value_zero(&(1, 0.0)));
        assert!(Box::new(f64::NAN).same_value_zero(&Box::new(f64::NAN)));
    }

    #[cfg(feature = "json")]
    #[test]
    fn json_values() {
        use serde_json::json;
        let s = RandomState::new();

        assert!(json!(1).same_value_zero(&json!(1.0)));
        assert_eq!(h(&s, &json!(1)), h(&s, &json!(1.0)));
        assert!(json!(0).same_value_zero(&json!(-0.0)));
        assert!(!json!(1).same_value_zero(&json!("1")));

        let a = json!({"path": "/foo", "depth": 2});
        let b = json!({"depth": 2.0, "path": "/foo"});
        assert!(a.same_value_zero(&b));
        assert_eq!(h(&s, &a), h(&s, &b));
        assert!(!a.same_value_zero(&json!({"path": "/foo"})));
        assert!(json!([null, true, [1]]).same_value_zero(&json!([null, true, [1.0]])));
    }

    /// Invariant: objects with the same keys but different field values land
    /// in different buckets.
    #[cfg(feature = "json")]
    #[test]
    fn json_objects_hash_their_fields() {
        use serde_json::json;
        let s = RandomState::new();

        assert_ne!(h(&s, &json!({"id": 1})), h(&s, &json!({"id": 2})));
        assert_ne!(h(&s, &json!({"id": 1})), h(&s, &json!({"key": 1})));
        let nested_a = json!({"outer": {"x": 0.0, "y": [1, 2]}});
        let nested_b = json!({"outer": {"y": [1.0, 2.0], "x": -0.0}});
        assert_eq!(h(&s, &nested_a), h(&s, &nested_b));

        let distinct: std::collections::HashSet<u64> =
            (0..1000).map(|i| h(&s, &json!({"id": i}))).collect();
        assert_eq!(distinct.len(), 1000);
    }
}
