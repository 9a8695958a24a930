//! The 64-bit type hash (§4.C).
//!
//! Every struct and enum gets a hash that fingerprints its wire
//! layout: field names, constant names and values, and a compact code
//! for each member's type+dimension shape, folded with a rolling
//! multiply-add and then, for structs, combined recursively with every
//! nested struct's own hash.
//!
//! This mirrors `__TYPE_get_hash`/`__TYPE_hash_recursive` as emitted by
//! the reference LCM code generator (see `original_source/lcmgen/emit_c.c`
//! in the retrieval pack): a compile-time seed per type, folded at
//! "codegen time" by [`crate::hash::fold_seed`], and a runtime
//! recursion that sums nested types' hashes and finalizes with a
//! single left-rotate-by-1 through the top bit.
//!
//! The seed constant below is arbitrary — spec.md does not pin one,
//! and nothing requires bit-exact equivalence with an unrelated LCM
//! deployment (see SPEC_FULL.md's Open Questions). What matters, and
//! what every test here checks, is internal consistency: the same
//! schema always yields the same hash, and no single-field rename,
//! reorder, retype, or dimension change collides.
use std::sync::OnceLock;

/// Seed the rolling fold starts from. Arbitrary but fixed.
pub const FOLD_SEED: u64 = 0x12a3_c4d5_e6f7_0819;

/// Rolling multiply-add fold over a byte string.
///
/// Used by `ripple-schema` to turn "member name", "constant name +
/// value", and "type+dimension shape code" into the compile-time seed
/// for a struct or enum. Each byte perturbs every later byte's
/// contribution, so renaming, reordering, or retyping a member changes
/// every subsequent accumulator value.
pub fn fold_seed(mut acc: u64, bytes: &[u8]) -> u64 {
    for &b in bytes {
        acc = acc
            .wrapping_mul(0x0100_0000_01b3)
            .wrapping_add(b as u64)
            .rotate_left(1);
    }
    acc
}

/// The left-rotate-by-1-through-the-top-bit finalization applied to
/// every struct's and enum's hash.
pub fn finalize(hash: i64) -> i64 {
    ((hash << 1) as u64 | ((hash as u64) >> 63 & 1)) as i64
}

/// Implemented by every codegen-emitted struct and enum.
///
/// `TYPE_SEED` is the compile-time fold over this type's own fields —
/// computed once by `ripple-schema`/`ripple-codegen` and baked into
/// the emitted `impl` as a literal, exactly as `emit_c.c` bakes
/// `ls->hash` into `__%s_hash_recursive`'s body.
pub trait TypeHash {
    /// This type's own compile-time seed (its fields' names/types/
    /// shapes folded together, *not* including any nested type's
    /// hash).
    const TYPE_SEED: u64;

    /// Computes this type's full hash, given the seeds of types
    /// already on the current recursion path (`visiting`).
    ///
    /// If `Self::TYPE_SEED` is already in `visiting`, a cyclic
    /// composition has been detected and `0` is returned without
    /// recursing further — the direct translation of `emit_c.c`'s
    /// function-pointer-identity cycle breaker, since a type's seed is
    /// already a stable per-type identity in this implementation.
    /// Composition is by value in `ripple-schema`, so this path is
    /// defensive rather than reachable through a well-formed schema.
    fn hash_recursive(visiting: &[u64]) -> i64;
}

/// Computes and memoizes `T`'s full hash, calling
/// [`TypeHash::hash_recursive`] exactly once per process per type.
///
/// The `static` below lives inside a function generic over `T`, so the
/// compiler monomorphizes one copy per `T` — each type gets its own
/// cache cell, the same way the reference generator emits one
/// `static int64_t __T_hash` per type.
pub fn get_hash<T: TypeHash>() -> i64 {
    static CACHE: OnceLock<i64> = OnceLock::new();
    *CACHE.get_or_init(|| T::hash_recursive(&[]))
}
