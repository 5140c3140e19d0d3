//! 1-out-of-2 oblivious transfer between two parties over a [`Channel`].
//!
//! The traits in this module are the seam consumed by OT extension layers:
//! a [`BaseOtSender`] hands back two 128-bit keys per instance, a
//! [`BaseOtReceiver`] the one selected by each choice bit. The only
//! instantiation is the semi-honest Naor-Pinkas protocol in [`naor_pinkas`].
//! Shared between both roles are the key derivation hash and the framing of
//! curve points on the wire.

pub mod naor_pinkas;

use p256::ProjectivePoint;
use rand::{CryptoRng, Rng};
use sha2::{Digest, Sha256};

use crate::{
    channel::{self, Channel},
    group,
};

/// Errors occurring during a batch of oblivious transfers.
///
/// Every error is fatal to the batch it occurred in: no partial key vectors
/// are ever returned and nothing is retried.
#[derive(Debug)]
pub enum Error {
    /// Bytes could not be sent or received over the channel.
    ChannelError(channel::Error),
    /// Received bytes do not decode to a point on the curve.
    InvalidPoint,
    /// A length prefix of zero was received where a point was expected.
    ZeroLengthPoint,
    /// A group operation failed in the underlying crypto library.
    GroupOpFailed,
    /// The batch was empty or its sizes were inconsistent.
    InvalidArgument,
}

/// Converts a `channel::Error` into a custom `Error` type.
impl From<channel::Error> for Error {
    fn from(e: channel::Error) -> Self {
        Self::ChannelError(e)
    }
}

/// A single 128-bit key produced by an oblivious transfer instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Key(
    /// The raw key bytes.
    pub [u8; 16],
);

/// Derives the key of one message slot from a group element and the role
/// nonce disambiguating the two slots of an instance.
///
/// The hash runs over the compressed hex encoding of the point (not its raw
/// bytes) followed by the nonce in little-endian; both parties must feed
/// the identical text, which is why the encoding produced by
/// [`group::point_to_hex`] is canonical. The first 16 digest bytes become
/// the key, in digest order.
pub(crate) fn hash_point(point: &ProjectivePoint, nonce: u64) -> Key {
    let mut hasher = Sha256::new();
    hasher.update(group::point_to_hex(point).as_bytes());
    hasher.update(nonce.to_le_bytes());
    let digest = hasher.finalize();
    let mut key = [0u8; 16];
    key.copy_from_slice(&digest[..16]);
    Key(key)
}

/// Sends a point as its length-prefixed compressed hex encoding.
pub(crate) async fn send_point(
    channel: &mut impl Channel,
    phase: &str,
    point: &ProjectivePoint,
) -> Result<(), Error> {
    let encoded = group::point_to_hex(point);
    channel::send_u64(channel, phase, encoded.len() as u64).await?;
    channel::send(channel, phase, encoded.into_bytes()).await?;
    Ok(())
}

/// Receives a length-prefixed compressed hex point.
pub(crate) async fn recv_point(
    channel: &mut impl Channel,
    phase: &str,
) -> Result<ProjectivePoint, Error> {
    let len = channel::recv_u64(channel, phase).await?;
    if len == 0 {
        return Err(Error::ZeroLengthPoint);
    }
    let len = usize::try_from(len).map_err(|_| Error::InvalidPoint)?;
    let encoded = channel::recv(channel, phase, len).await?;
    group::point_from_hex(&encoded).ok_or(Error::InvalidPoint)
}

/// Trait for 1-out-of-2 oblivious transfer from the sender's point-of-view.
pub trait BaseOtSender {
    /// Runs a batch of `count` transfers and returns the two keys of every
    /// instance, message-zero keys first.
    #[allow(async_fn_in_trait)]
    async fn send<C: Channel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        count: usize,
        rng: &mut RNG,
    ) -> Result<(Vec<Key>, Vec<Key>), Error>;
}

/// Trait for 1-out-of-2 oblivious transfer from the receiver's
/// point-of-view.
pub trait BaseOtReceiver {
    /// Runs one transfer per choice bit and returns the key of the chosen
    /// message slot of every instance.
    #[allow(async_fn_in_trait)]
    async fn receive<C: Channel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        choices: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<Key>, Error>;
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;

    use super::hash_point;
    use crate::group;

    #[test]
    fn nonces_separate_the_two_slots() {
        let mut rng = ChaCha20Rng::seed_from_u64(4);
        let point = group::random_point(&mut rng);
        assert_eq!(hash_point(&point, 0), hash_point(&point, 0));
        assert_ne!(hash_point(&point, 0), hash_point(&point, 1));
    }

    #[test]
    fn distinct_points_derive_distinct_keys() {
        let mut rng = ChaCha20Rng::seed_from_u64(5);
        let p = group::random_point(&mut rng);
        let q = group::random_point(&mut rng);
        assert_ne!(hash_point(&p, 0), hash_point(&q, 0));
    }
}
