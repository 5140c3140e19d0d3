//! Implementation of the batched Naor-Pinkas oblivious transfer protocol
//! (cf. <https://dl.acm.org/doi/10.5555/365411.365502>).
//!
//! One random group element `M` is shared by every instance of a batch,
//! which is sound because a batch always runs between the same pair of
//! parties. The sender learns nothing about a choice bit since the `s_i` it
//! receives is a uniformly random group element either way; the receiver
//! can know the exponent of only one of `s_i` and `M - s_i`, because
//! knowing both would reveal the discrete log of `M`. Security is
//! semi-honest.

use p256::Scalar;
use rand::{CryptoRng, Rng};
use zeroize::Zeroizing;

use crate::{
    channel::Channel,
    group,
    ot::{hash_point, recv_point, send_point, BaseOtReceiver, BaseOtSender, Error, Key},
};

/// Oblivious transfer sender. Holds no state across batches.
#[derive(Debug, Default)]
pub struct Sender {}

/// Oblivious transfer receiver. Holds no state across batches.
#[derive(Debug, Default)]
pub struct Receiver {}

impl BaseOtSender for Sender {
    async fn send<C: Channel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        count: usize,
        rng: &mut RNG,
    ) -> Result<(Vec<Key>, Vec<Key>), Error> {
        if count == 0 {
            return Err(Error::InvalidArgument);
        }

        let m = group::random_point(rng);
        send_point(channel, "NP_OT_m", &m).await?;

        let mut rs: Zeroizing<Vec<Scalar>> = Zeroizing::new(Vec::with_capacity(count));
        let mut gr = Vec::with_capacity(count);
        let mut mr = Vec::with_capacity(count);
        for _ in 0..count {
            let r = group::random_scalar(rng);
            gr.push(group::generator_mul(&r));
            mr.push(m * r);
            rs.push(r);
        }

        // All s_i must be on the wire before the first g^r goes out, so the
        // receiver cannot pick s_i adaptively.
        let mut s = Vec::with_capacity(count);
        for _ in 0..count {
            s.push(recv_point(channel, "NP_OT_s").await?);
        }
        for a in &gr {
            send_point(channel, "NP_OT_a", a).await?;
        }

        let mut keys0 = Vec::with_capacity(count);
        let mut keys1 = Vec::with_capacity(count);
        for ((&s_i, &r_i), &mr_i) in s.iter().zip(rs.iter()).zip(mr.iter()) {
            let t0 = s_i * r_i;
            let t1 = mr_i - t0;
            keys0.push(hash_point(&t0, 0));
            keys1.push(hash_point(&t1, 1));
        }
        Ok((keys0, keys1))
    }
}

impl BaseOtReceiver for Receiver {
    async fn receive<C: Channel, RNG: CryptoRng + Rng>(
        &mut self,
        channel: &mut C,
        choices: &[bool],
        rng: &mut RNG,
    ) -> Result<Vec<Key>, Error> {
        if choices.is_empty() {
            return Err(Error::InvalidArgument);
        }

        let m = recv_point(channel, "NP_OT_m").await?;

        let mut ds: Zeroizing<Vec<Scalar>> = Zeroizing::new(Vec::with_capacity(choices.len()));
        for &choice in choices {
            // d_i comes from [1, q-1]: g^0 would put the identity on the
            // wire.
            let d = group::random_nonzero_scalar(rng);
            let s_chosen = group::generator_mul(&d);
            // The second candidate is computed whatever the choice bit, so
            // both values of the bit perform the same group operations.
            let s_other = m - s_chosen;
            let s0 = if choice { s_other } else { s_chosen };
            send_point(channel, "NP_OT_s", &s0).await?;
            ds.push(d);
        }

        let mut a = Vec::with_capacity(choices.len());
        for _ in 0..choices.len() {
            a.push(recv_point(channel, "NP_OT_a").await?);
        }

        let mut keys = Vec::with_capacity(choices.len());
        for ((&a_i, &d_i), &choice) in a.iter().zip(ds.iter()).zip(choices.iter()) {
            let k = a_i * d_i;
            keys.push(hash_point(&k, choice as u64));
        }
        Ok(keys)
    }
}
