//! Error sentinel shared by every fallible operation in the crate.

/// The single failure mode of the bit-plane and raster cores: an allocation
/// could not be satisfied. Corresponds to the `AllocError` (-2) sentinel of
/// the reference implementation this crate's semantics are drawn from.
///
/// Every op that can return this releases whatever it had already allocated
/// in the same call before returning; there are no partial writes on
/// allocation failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum RasterError {
    #[error("allocation failed")]
    Alloc,
}

pub type Result<T> = std::result::Result<T, RasterError>;

/// Reserve exactly `len` elements of `T`, zero-initialized, as a `Vec`,
/// surfacing allocation failure as [`RasterError::Alloc`] instead of
/// aborting the process.
pub(crate) fn try_zeroed_vec<T: Default + Clone>(len: usize) -> Result<Vec<T>> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| RasterError::Alloc)?;
    v.resize(len, T::default());
    Ok(v)
}
