//! Structural equality
//!
//! Compares two value graphs by shape and content. A pair of handles already
//! under comparison is assumed equal, so cyclic graphs terminate. Pending
//! pairs live on an explicit stack, so deep chains compare without recursion.

use std::cell::RefCell;

use rustc_hash::FxHashSet;

use super::key::Identity;
use super::value::Value;

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        let mut comparator = Comparator::default();
        comparator.push(self, other);
        comparator.run()
    }
}

#[derive(Default)]
struct Comparator {
    assumed: FxHashSet<(Identity, Identity)>,
    pending: Vec<(Value, Value)>,
}

impl Comparator {
    fn push(&mut self, a: &Value, b: &Value) {
        self.pending.push((a.clone(), b.clone()));
    }

    fn run(&mut self) -> bool {
        while let Some((a, b)) = self.pending.pop() {
            if !self.step(&a, &b) {
                self.pending.clear();
                return false;
            }
        }
        true
    }

    /// Checks one pair and queues its children.
    fn step(&mut self, a: &Value, b: &Value) -> bool {
        match (a, b) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(x), Value::Bool(y)) => x == y,
            (Value::Int(x), Value::Int(y)) => x == y,
            // Bit pattern, matching `Value::same` and key hashing; NaN equals itself.
            (Value::Float(x), Value::Float(y)) => x.to_bits() == y.to_bits(),
            (Value::Char(x), Value::Char(y)) => x == y,
            (Value::Str(x), Value::Str(y)) => x == y,
            (Value::Enum(x), Value::Enum(y)) => x == y,

            (Value::List(x), Value::List(y)) => self.enter(a, b, |c| c.sequences(x, y)),
            (Value::Array(x), Value::Array(y)) => self.enter(a, b, |c| c.sequences(x, y)),
            (Value::Set(x), Value::Set(y)) => self.enter(a, b, |c| {
                let (Ok(x), Ok(y)) = (x.try_borrow(), y.try_borrow()) else {
                    return false;
                };
                if x.len() != y.len() {
                    return false;
                }
                for item in x.iter() {
                    if y.contains(item) {
                        continue;
                    }
                    let found = y
                        .iter()
                        .any(|candidate| c.try_match(&[(item.value(), candidate.value())]));
                    if !found {
                        return false;
                    }
                }
                true
            }),
            (Value::Map(x), Value::Map(y)) => self.enter(a, b, |c| {
                let (Ok(x), Ok(y)) = (x.try_borrow(), y.try_borrow()) else {
                    return false;
                };
                if x.len() != y.len() {
                    return false;
                }
                for (key, value) in x.iter() {
                    if let Some(other) = y.get(key) {
                        c.push(value, other);
                        continue;
                    }
                    let found = y.iter().any(|(other_key, other)| {
                        c.try_match(&[(key.value(), other_key.value()), (value, other)])
                    });
                    if !found {
                        return false;
                    }
                }
                true
            }),
            (Value::Object(x), Value::Object(y)) => self.enter(a, b, |c| {
                let (Ok(x), Ok(y)) = (x.try_borrow(), y.try_borrow()) else {
                    return false;
                };
                if x.type_name() != y.type_name() {
                    return false;
                }
                let (xs, ys) = (x.fields(), y.fields());
                if xs.len() != ys.len() {
                    return false;
                }
                for (f, g) in xs.iter().zip(ys.iter()) {
                    if f.name != g.name {
                        return false;
                    }
                    c.push(&f.value, &g.value);
                }
                true
            }),
            _ => false,
        }
    }

    fn sequences<S>(&mut self, x: &RefCell<S>, y: &RefCell<S>) -> bool
    where
        S: AsRef<[Value]> + ?Sized,
    {
        let (Ok(x), Ok(y)) = (x.try_borrow(), y.try_borrow()) else {
            return false;
        };
        let (x, y) = ((*x).as_ref(), (*y).as_ref());
        if x.len() != y.len() {
            return false;
        }
        for (p, q) in x.iter().zip(y.iter()) {
            self.push(p, q);
        }
        true
    }

    /// Compares `pairs` to completion on a side stack. The assumptions made
    /// along the way are kept only if every pair matched.
    fn try_match(&mut self, pairs: &[(&Value, &Value)]) -> bool {
        let mut side = Comparator {
            assumed: self.assumed.clone(),
            pending: Vec::new(),
        };
        for (a, b) in pairs {
            side.push(a, b);
        }
        let equal = side.run();
        if equal {
            self.assumed = side.assumed;
        }
        equal
    }

    fn enter(&mut self, a: &Value, b: &Value, compare: impl FnOnce(&mut Self) -> bool) -> bool {
        let (Some(ia), Some(ib)) = (a.identity(), b.identity()) else {
            return false;
        };
        if ia == ib || !self.assumed.insert((ia, ib)) {
            return true;
        }
        compare(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn containers_compare_by_content() {
        assert_eq!(
            Value::list([Value::str("Kotlin"), Value::str("Java")]),
            Value::list([Value::str("Kotlin"), Value::str("Java")])
        );
        assert_ne!(Value::list([Value::Int(1)]), Value::array([Value::Int(1)]));
        assert_eq!(
            Value::set([Value::Int(1), Value::Int(2)]),
            Value::set([Value::Int(2), Value::Int(1)])
        );
    }

    #[test]
    fn sets_of_handles_match_by_structure() {
        let a = Value::set([Value::list([Value::Int(1)]), Value::list([Value::Int(2)])]);
        let b = Value::set([Value::list([Value::Int(2)]), Value::list([Value::Int(1)])]);
        assert_eq!(a, b);
    }

    #[test]
    fn nan_equals_itself() {
        assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
        assert_eq!(
            Value::list([Value::Float(f64::NAN)]),
            Value::list([Value::Float(f64::NAN)])
        );
        assert_ne!(Value::Float(0.0), Value::Float(-0.0));
    }

    #[test]
    fn maps_with_handle_keys_match_by_structure() {
        let a = Value::map([(Value::list([Value::Int(1)]), Value::str("one"))]);
        let b = Value::map([(Value::list([Value::Int(1)]), Value::str("one"))]);
        let c = Value::map([(Value::list([Value::Int(1)]), Value::str("uno"))]);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    fn nested(depth: usize, leaf: i64) -> Value {
        let mut value = Value::Int(leaf);
        for _ in 0..depth {
            value = Value::list([value]);
        }
        value
    }

    fn unnest(value: Value) {
        let mut current = value;
        loop {
            let inner = current.as_list().and_then(|items| items.borrow_mut().pop());
            match inner {
                Some(inner) => current = inner,
                None => break,
            }
        }
    }

    #[test]
    fn deep_nesting_compares_without_recursion() {
        let a = nested(200_000, 1);
        let b = nested(200_000, 1);
        let c = nested(200_000, 2);
        assert!(a == b);
        assert!(a != c);
        for v in [a, b, c] {
            unnest(v);
        }
    }

    #[test]
    fn self_containing_lists_terminate() {
        let a = Value::list([Value::Int(1)]);
        if let Some(items) = a.as_list() {
            items.borrow_mut().push(a.clone());
        }
        let b = Value::list([Value::Int(1)]);
        if let Some(items) = b.as_list() {
            items.borrow_mut().push(b.clone());
        }
        assert_eq!(a, b);

        let c = Value::list([Value::Int(2)]);
        if let Some(items) = c.as_list() {
            items.borrow_mut().push(c.clone());
        }
        assert_ne!(a, c);

        for v in [a, b, c] {
            if let Some(items) = v.as_list() {
                items.borrow_mut().clear();
            }
        }
    }
}
