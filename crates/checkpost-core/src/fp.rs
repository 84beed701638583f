//! Pure function-pipeline primitives.
//!
//! Composition, fixed-arity currying, curried sequence operations, and
//! transducers. These are the building blocks the check-in reducer is
//! assembled from. Everything here is pure; the only observable side effect
//! is the logging performed by [`trace`].
//!
//! Currying is expressed with per-arity generators ([`curry2`], [`curry3`])
//! rather than runtime arity inspection, so partial application is checked
//! at compile time.

use std::fmt;

use tracing::debug;

/// Composes functions right to left.
///
/// `compose!(f, g)(x)` is `f(g(x))`. With a single function it is that
/// function; with no functions it is the identity closure.
///
/// # Example
///
/// ```
/// use checkpost_core::compose;
///
/// let add_one = |x: i32| x + 1;
/// let double = |x: i32| x * 2;
/// let add_then_double = compose!(double, add_one);
/// assert_eq!(add_then_double(3), 8);
/// ```
#[macro_export]
macro_rules! compose {
    () => {
        |value| value
    };
    ($f:expr) => {
        $f
    };
    ($f:expr, $($rest:expr),+ $(,)?) => {
        move |value| $f($crate::compose!($($rest),+)(value))
    };
}

/// Returns its argument unchanged.
pub fn identity<T>(value: T) -> T {
    value
}

/// Composes exactly two functions right to left: `compose2(f, g)(x) == f(g(x))`.
///
/// Function form of [`compose!`] for the common two-stage case, usable where
/// a value of function type is needed.
pub fn compose2<A, B, C>(f: impl Fn(B) -> C, g: impl Fn(A) -> B) -> impl Fn(A) -> C {
    move |value| f(g(value))
}

/// Curries a two-argument function.
///
/// `curry2(f)(a)(b)` equals `f(a, b)`. The intermediate closure may be
/// applied any number of times.
pub fn curry2<A, B, R, F>(f: F) -> impl Fn(A) -> Box<dyn Fn(B) -> R>
where
    F: Fn(A, B) -> R + Clone + 'static,
    A: Clone + 'static,
    B: 'static,
    R: 'static,
{
    move |a: A| {
        let f = f.clone();
        Box::new(move |b: B| f(a.clone(), b)) as Box<dyn Fn(B) -> R>
    }
}

/// Curries a three-argument function.
///
/// `curry3(f)(a)(b)(c)` equals `f(a, b, c)`, and every partially-applied
/// step is reusable.
pub fn curry3<A, B, C, R, F>(f: F) -> impl Fn(A) -> Box<dyn Fn(B) -> Box<dyn Fn(C) -> R>>
where
    F: Fn(A, B, C) -> R + Clone + 'static,
    A: Clone + 'static,
    B: Clone + 'static,
    C: 'static,
    R: 'static,
{
    move |a: A| {
        let f = f.clone();
        let a_outer = a.clone();
        Box::new(move |b: B| {
            let f = f.clone();
            let a = a_outer.clone();
            Box::new(move |c: C| f(a.clone(), b.clone(), c)) as Box<dyn Fn(C) -> R>
        }) as Box<dyn Fn(B) -> Box<dyn Fn(C) -> R>>
    }
}

/// Curried map: takes the transform first and returns a reusable mapper
/// awaiting a sequence.
pub fn map<T, U, F>(f: F) -> impl Fn(&[T]) -> Vec<U>
where
    F: Fn(&T) -> U,
{
    move |items| items.iter().map(&f).collect()
}

/// Curried filter: takes the predicate first and returns a reusable filter
/// awaiting a sequence.
pub fn filter<T, P>(predicate: P) -> impl Fn(&[T]) -> Vec<T>
where
    T: Clone,
    P: Fn(&T) -> bool,
{
    move |items| items.iter().filter(|&item| predicate(item)).cloned().collect()
}

/// Curried fold: takes the reducer and seed first and returns a reusable
/// accumulator awaiting a sequence.
pub fn fold<T, Acc, F>(reducer: F, init: Acc) -> impl Fn(&[T]) -> Acc
where
    Acc: Clone,
    F: Fn(Acc, &T) -> Acc,
{
    move |items| items.iter().fold(init.clone(), &reducer)
}

/// Appends a value to a list; the canonical combiner for transduction.
pub fn list_combine<T>(mut list: Vec<T>, value: T) -> Vec<T> {
    list.push(value);
    list
}

/// Builds a mapping reducer: each element is transformed before being
/// handed to the combiner.
pub fn transduce_map<T, U, Acc, M, C>(mapper: M, combiner: C) -> impl Fn(Acc, T) -> Acc
where
    M: Fn(T) -> U,
    C: Fn(Acc, U) -> Acc,
{
    move |acc, value| combiner(acc, mapper(value))
}

/// Builds a filtering reducer: elements failing the predicate leave the
/// accumulator untouched.
pub fn transduce_filter<T, Acc, P, C>(predicate: P, combiner: C) -> impl Fn(Acc, T) -> Acc
where
    P: Fn(&T) -> bool,
    C: Fn(Acc, T) -> Acc,
{
    move |acc, value| {
        if predicate(&value) {
            combiner(acc, value)
        } else {
            acc
        }
    }
}

/// Drives a single accumulation pass through `items` using the reducer the
/// transducer produces from `combiner`.
///
/// Stacked [`transduce_map`]/[`transduce_filter`] stages fuse into that one
/// pass; no intermediate sequence is materialized and element order is
/// preserved.
///
/// # Example
///
/// ```
/// use checkpost_core::fp::{list_combine, transduce, transduce_map};
///
/// let doubled = transduce(
///     |combine| transduce_map(|v: i32| v * 2, combine),
///     list_combine,
///     Vec::new(),
///     vec![1, 2, 3],
/// );
/// assert_eq!(doubled, vec![2, 4, 6]);
/// ```
pub fn transduce<T, Acc, C, Rd, Tr>(
    transducer: Tr,
    combiner: C,
    init: Acc,
    items: impl IntoIterator<Item = T>,
) -> Acc
where
    Tr: FnOnce(C) -> Rd,
    Rd: Fn(Acc, T) -> Acc,
{
    let reducer = transducer(combiner);
    items.into_iter().fold(init, reducer)
}

/// Wraps a function so each call logs its argument before delegating.
///
/// The return value is forwarded unchanged and no error or timing behavior
/// of `f` is altered. `label` names the wrapped function in the log stream,
/// since closures carry no name of their own.
pub fn trace<A, R, F>(label: &'static str, f: F) -> impl Fn(A) -> R
where
    A: fmt::Debug,
    F: Fn(A) -> R,
{
    move |arg| {
        debug!(label, arg = ?arg, "trace");
        f(arg)
    }
}
