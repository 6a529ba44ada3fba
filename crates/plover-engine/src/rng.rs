//! Seeded random source shared between a generator and its caller.
//!
//! Every random choice a generator makes goes through one handle, in a fixed
//! enumeration order, so runs are reproducible from the seed.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub type SharedRng = Rc<RefCell<StdRng>>;

/// A new handle seeded with `seed`, or from OS entropy when `None`.
pub fn shared_rng(seed: Option<u64>) -> SharedRng {
    let rng = match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    Rc::new(RefCell::new(rng))
}

/// Uniform index in `0..len`. Does not consume randomness when `len == 1`.
pub(crate) fn choose_index(rng: &SharedRng, len: usize) -> usize {
    debug_assert!(len > 0);
    if len <= 1 {
        0
    } else {
        rng.borrow_mut().gen_range(0..len)
    }
}

/// Uniformly chosen element of `items`.
pub(crate) fn choose<T: Copy>(rng: &SharedRng, items: &[T]) -> Option<T> {
    if items.is_empty() {
        None
    } else {
        Some(items[choose_index(rng, items.len())])
    }
}
