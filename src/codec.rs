//! Public entry points: `bound`, `Coder1234`, `Coder0124`.
//!
//! Every encode method takes a single `out: &mut [u8]` at least [`bound`]
//! bytes long and returns the number of bytes actually written; the key
//! block (`ceil(values.len() / 4)` bytes) always precedes the data block.
//! Every decode method takes the matching `n` out-of-band and a `values: &mut
//! [u32]` of exactly `n` elements.
//!
//! Bulk groups of 4 go through `coder_impl`/`tile`, generic over
//! [`crate::raw_group::RawGroup`]; the 0-3 remaining elements are handled
//! byte-at-a-time here, tracking a `keys` byte and a bit `shift` the same way
//! the teacher's scalar kernels do for full groups.

use crate::coding_descriptor::CodingDescriptor;
use crate::format0124::CodingDescriptor0124;
use crate::format1234::CodingDescriptor1234;
use crate::preprocess::{delta_decode, delta_encode, zigzag_decode, zigzag_encode};
use crate::tile::TILE_LEN;

/// Upper bound, in bytes, on the encoded size of `n` values: one key byte
/// per four values plus up to 4 bytes of payload per value.
#[inline]
pub fn bound(n: usize) -> usize {
    (n + 3) / 4 + 4 * n
}

#[inline]
fn key_len(n: usize) -> usize {
    (n + 3) / 4
}

fn scalar_tail_encode<D: CodingDescriptor<Elem = u32>>(
    values: &[u32],
    key: &mut u8,
    data: &mut [u8],
) -> usize {
    let mut shift = 0u8;
    let mut written = 0usize;
    let mut k = 0u8;
    for &v in values {
        let (tag, len) = D::tag_value(v);
        k |= tag << shift;
        shift += 2;
        data[written..written + len].copy_from_slice(&v.to_le_bytes()[..len]);
        written += len;
    }
    *key = k;
    written
}

fn scalar_tail_decode<D: CodingDescriptor<Elem = u32>>(
    key: u8,
    count: usize,
    data: &[u8],
    values: &mut [u32],
) -> usize {
    let mut shift = 0u8;
    let mut read = 0usize;
    for v in values.iter_mut().take(count) {
        let tag = (key >> shift) & 0x3;
        shift += 2;
        let len = D::TAG_LEN[tag as usize];
        let mut buf = [0u8; 4];
        buf[..len].copy_from_slice(&data[read..read + len]);
        *v = u32::from_le_bytes(buf) & D::TAG_MAX[tag as usize];
        read += len;
    }
    read
}

fn scalar_tail_encode_delta<D: CodingDescriptor<Elem = u32>>(
    previous: u32,
    values: &[u32],
    key: &mut u8,
    data: &mut [u8],
) -> usize {
    let mut prev = previous;
    let mut shift = 0u8;
    let mut written = 0usize;
    let mut k = 0u8;
    for &v in values {
        let delta = delta_encode(v, prev);
        prev = v;
        let (tag, len) = D::tag_value(delta);
        k |= tag << shift;
        shift += 2;
        data[written..written + len].copy_from_slice(&delta.to_le_bytes()[..len]);
        written += len;
    }
    *key = k;
    written
}

fn scalar_tail_decode_delta<D: CodingDescriptor<Elem = u32>>(
    previous: u32,
    key: u8,
    count: usize,
    data: &[u8],
    values: &mut [u32],
) -> usize {
    let mut prev = previous;
    let mut shift = 0u8;
    let mut read = 0usize;
    for v in values.iter_mut().take(count) {
        let tag = (key >> shift) & 0x3;
        shift += 2;
        let len = D::TAG_LEN[tag as usize];
        let mut buf = [0u8; 4];
        buf[..len].copy_from_slice(&data[read..read + len]);
        let delta = u32::from_le_bytes(buf) & D::TAG_MAX[tag as usize];
        read += len;
        let x = delta_decode(delta, prev);
        *v = x;
        prev = x;
    }
    read
}

fn scalar_tail_encode_zigzag<D: CodingDescriptor<Elem = u32>>(
    values: &[u32],
    key: &mut u8,
    data: &mut [u8],
) -> usize {
    let mut shift = 0u8;
    let mut written = 0usize;
    let mut k = 0u8;
    for &v in values {
        let z = zigzag_encode(v);
        let (tag, len) = D::tag_value(z);
        k |= tag << shift;
        shift += 2;
        data[written..written + len].copy_from_slice(&z.to_le_bytes()[..len]);
        written += len;
    }
    *key = k;
    written
}

fn scalar_tail_decode_zigzag<D: CodingDescriptor<Elem = u32>>(
    key: u8,
    count: usize,
    data: &[u8],
    values: &mut [u32],
) -> usize {
    let mut shift = 0u8;
    let mut read = 0usize;
    for v in values.iter_mut().take(count) {
        let tag = (key >> shift) & 0x3;
        shift += 2;
        let len = D::TAG_LEN[tag as usize];
        let mut buf = [0u8; 4];
        buf[..len].copy_from_slice(&data[read..read + len]);
        *v = zigzag_decode(u32::from_le_bytes(buf) & D::TAG_MAX[tag as usize]);
        read += len;
    }
    read
}

fn scalar_tail_encode_delta_zigzag<D: CodingDescriptor<Elem = u32>>(
    previous: u32,
    values: &[u32],
    key: &mut u8,
    data: &mut [u8],
) -> usize {
    let mut prev = previous;
    let mut shift = 0u8;
    let mut written = 0usize;
    let mut k = 0u8;
    for &v in values {
        let z = zigzag_encode(delta_encode(v, prev));
        prev = v;
        let (tag, len) = D::tag_value(z);
        k |= tag << shift;
        shift += 2;
        data[written..written + len].copy_from_slice(&z.to_le_bytes()[..len]);
        written += len;
    }
    *key = k;
    written
}

fn scalar_tail_decode_delta_zigzag<D: CodingDescriptor<Elem = u32>>(
    previous: u32,
    key: u8,
    count: usize,
    data: &[u8],
    values: &mut [u32],
) -> usize {
    let mut prev = previous;
    let mut shift = 0u8;
    let mut read = 0usize;
    for v in values.iter_mut().take(count) {
        let tag = (key >> shift) & 0x3;
        shift += 2;
        let len = D::TAG_LEN[tag as usize];
        let mut buf = [0u8; 4];
        buf[..len].copy_from_slice(&data[read..read + len]);
        let z = u32::from_le_bytes(buf) & D::TAG_MAX[tag as usize];
        let x = delta_decode(zigzag_decode(z), prev);
        *v = x;
        prev = x;
    }
    read
}

macro_rules! define_coder {
    ($name:ident, $fmt:ident, $descriptor:ident) => {
        /// Runtime-dispatched codec for one `streamvbyte` key format.
        #[derive(Clone, Copy)]
        pub struct $name(crate::$fmt::Impl);

        impl $name {
            /// Selects the best available implementation for the current CPU.
            pub fn new() -> Self {
                $name(crate::$fmt::Impl::detect())
            }

            /// Encodes `values` into `out`, returning the number of bytes
            /// written. `out` must be at least [`bound`]`(values.len())` bytes.
            pub fn encode(&self, values: &[u32], out: &mut [u8]) -> usize {
                let n = values.len();
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = out.split_at_mut(klen);
                let mut written = crate::$fmt::encode(self.0, &values[..full4], tags, data);
                if n > full4 {
                    written +=
                        scalar_tail_encode::<$descriptor>(&values[full4..], &mut tags[full4 / 4], &mut data[written..]);
                }
                klen + written
            }

            /// Decodes `n` values from `input` into `values`.
            pub fn decode(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize {
                assert_eq!(values.len(), n);
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = input.split_at(klen);
                let (head, tail) = values.split_at_mut(full4);
                let mut read = crate::$fmt::decode(self.0, &tags[..full4 / 4], data, head);
                if n > full4 {
                    read += scalar_tail_decode::<$descriptor>(
                        tags[full4 / 4],
                        n - full4,
                        &data[read..],
                        tail,
                    );
                }
                read
            }

            /// Encodes `values` after a zig-zag transform of every element.
            pub fn encode_zigzag(&self, values: &[u32], out: &mut [u8]) -> usize {
                let n = values.len();
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = out.split_at_mut(klen);
                let mut written = crate::$fmt::encode_zigzag(self.0, &values[..full4], tags, data);
                if n > full4 {
                    written += scalar_tail_encode_zigzag::<$descriptor>(
                        &values[full4..],
                        &mut tags[full4 / 4],
                        &mut data[written..],
                    );
                }
                klen + written
            }

            /// Inverse of [`Self::encode_zigzag`].
            pub fn decode_zigzag(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize {
                assert_eq!(values.len(), n);
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = input.split_at(klen);
                let (head, tail) = values.split_at_mut(full4);
                let mut read = crate::$fmt::decode_zigzag(self.0, &tags[..full4 / 4], data, head);
                if n > full4 {
                    read += scalar_tail_decode_zigzag::<$descriptor>(
                        tags[full4 / 4],
                        n - full4,
                        &data[read..],
                        tail,
                    );
                }
                read
            }

            /// Encodes `values` as successive deltas seeded by `previous`.
            pub fn encode_delta(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize {
                let n = values.len();
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = out.split_at_mut(klen);
                let mut written =
                    crate::$fmt::encode_deltas(self.0, previous, &values[..full4], tags, data);
                if n > full4 {
                    let seed = if full4 > 0 { values[full4 - 1] } else { previous };
                    written += scalar_tail_encode_delta::<$descriptor>(
                        seed,
                        &values[full4..],
                        &mut tags[full4 / 4],
                        &mut data[written..],
                    );
                }
                klen + written
            }

            /// Inverse of [`Self::encode_delta`].
            pub fn decode_delta(
                &self,
                previous: u32,
                input: &[u8],
                n: usize,
                values: &mut [u32],
            ) -> usize {
                assert_eq!(values.len(), n);
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = input.split_at(klen);
                let (head, tail) = values.split_at_mut(full4);
                let mut read =
                    crate::$fmt::decode_deltas(self.0, previous, &tags[..full4 / 4], data, head);
                if n > full4 {
                    let seed = if full4 > 0 { head[full4 - 1] } else { previous };
                    read += scalar_tail_decode_delta::<$descriptor>(
                        seed,
                        tags[full4 / 4],
                        n - full4,
                        &data[read..],
                        tail,
                    );
                }
                read
            }

            /// Encodes `values` as zig-zagged successive deltas.
            pub fn encode_delta_zigzag(
                &self,
                previous: u32,
                values: &[u32],
                out: &mut [u8],
            ) -> usize {
                let n = values.len();
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = out.split_at_mut(klen);
                let mut written = crate::$fmt::encode_deltas_zigzag(
                    self.0,
                    previous,
                    &values[..full4],
                    tags,
                    data,
                );
                if n > full4 {
                    let seed = if full4 > 0 { values[full4 - 1] } else { previous };
                    written += scalar_tail_encode_delta_zigzag::<$descriptor>(
                        seed,
                        &values[full4..],
                        &mut tags[full4 / 4],
                        &mut data[written..],
                    );
                }
                klen + written
            }

            /// Inverse of [`Self::encode_delta_zigzag`].
            pub fn decode_delta_zigzag(
                &self,
                previous: u32,
                input: &[u8],
                n: usize,
                values: &mut [u32],
            ) -> usize {
                assert_eq!(values.len(), n);
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let (tags, data) = input.split_at(klen);
                let (head, tail) = values.split_at_mut(full4);
                let mut read = crate::$fmt::decode_deltas_zigzag(
                    self.0,
                    previous,
                    &tags[..full4 / 4],
                    data,
                    head,
                );
                if n > full4 {
                    let seed = if full4 > 0 { head[full4 - 1] } else { previous };
                    read += scalar_tail_decode_delta_zigzag::<$descriptor>(
                        seed,
                        tags[full4 / 4],
                        n - full4,
                        &data[read..],
                        tail,
                    );
                }
                read
            }

            /// Encodes `values` using the delta-transpose (`dt`) tiling: full
            /// 64-element tiles are transposed before delta coding, the 0-63
            /// element remainder falls back to plain delta.
            pub fn encode_delta_transpose(
                &self,
                previous: u32,
                values: &[u32],
                out: &mut [u8],
            ) -> usize {
                let n = values.len();
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let tiled = full4 / TILE_LEN * TILE_LEN;
                let (tags, data) = out.split_at_mut(klen);
                let mut written = 0usize;
                let mut tag_off = 0usize;
                let mut seed = previous;
                if tiled > 0 {
                    let (w, s) = crate::$fmt::encode_delta_transpose(
                        self.0,
                        seed,
                        &values[..tiled],
                        &mut tags[..tiled / 4],
                        data,
                    );
                    written += w;
                    tag_off += tiled / 4;
                    seed = s;
                }
                if full4 > tiled {
                    written += crate::$fmt::encode_deltas(
                        self.0,
                        seed,
                        &values[tiled..full4],
                        &mut tags[tag_off..full4 / 4],
                        &mut data[written..],
                    );
                    seed = values[full4 - 1];
                }
                if n > full4 {
                    written += scalar_tail_encode_delta::<$descriptor>(
                        seed,
                        &values[full4..],
                        &mut tags[full4 / 4],
                        &mut data[written..],
                    );
                }
                klen + written
            }

            /// Inverse of [`Self::encode_delta_transpose`].
            pub fn decode_delta_transpose(
                &self,
                previous: u32,
                input: &[u8],
                n: usize,
                values: &mut [u32],
            ) -> usize {
                assert_eq!(values.len(), n);
                let klen = key_len(n);
                let full4 = n / 4 * 4;
                let tiled = full4 / TILE_LEN * TILE_LEN;
                let (tags, data) = input.split_at(klen);
                let mut read = 0usize;
                let mut tag_off = 0usize;
                let mut seed = previous;
                if tiled > 0 {
                    let (r, s) = crate::$fmt::decode_delta_transpose(
                        self.0,
                        seed,
                        &tags[..tiled / 4],
                        data,
                        &mut values[..tiled],
                    );
                    read += r;
                    tag_off += tiled / 4;
                    seed = s;
                }
                if full4 > tiled {
                    read += crate::$fmt::decode_deltas(
                        self.0,
                        seed,
                        &tags[tag_off..full4 / 4],
                        &data[read..],
                        &mut values[tiled..full4],
                    );
                    seed = values[full4 - 1];
                }
                if n > full4 {
                    read += scalar_tail_decode_delta::<$descriptor>(
                        seed,
                        tags[full4 / 4],
                        n - full4,
                        &data[read..],
                        &mut values[full4..],
                    );
                }
                read
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl StreamCodec for $name {
            fn encode(&self, values: &[u32], out: &mut [u8]) -> usize {
                $name::encode(self, values, out)
            }
            fn decode(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize {
                $name::decode(self, input, n, values)
            }
            fn encode_zigzag(&self, values: &[u32], out: &mut [u8]) -> usize {
                $name::encode_zigzag(self, values, out)
            }
            fn decode_zigzag(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize {
                $name::decode_zigzag(self, input, n, values)
            }
            fn encode_delta(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize {
                $name::encode_delta(self, previous, values, out)
            }
            fn decode_delta(&self, previous: u32, input: &[u8], n: usize, values: &mut [u32]) -> usize {
                $name::decode_delta(self, previous, input, n, values)
            }
            fn encode_delta_zigzag(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize {
                $name::encode_delta_zigzag(self, previous, values, out)
            }
            fn decode_delta_zigzag(
                &self,
                previous: u32,
                input: &[u8],
                n: usize,
                values: &mut [u32],
            ) -> usize {
                $name::decode_delta_zigzag(self, previous, input, n, values)
            }
            fn encode_delta_transpose(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize {
                $name::encode_delta_transpose(self, previous, values, out)
            }
            fn decode_delta_transpose(
                &self,
                previous: u32,
                input: &[u8],
                n: usize,
                values: &mut [u32],
            ) -> usize {
                $name::decode_delta_transpose(self, previous, input, n, values)
            }
        }
    };
}

/// Shared interface implemented by both key formats: one method pair per
/// preprocessing variant, each taking the data buffer and (for delta
/// variants) the out-of-band `previous` seed.
pub trait StreamCodec {
    fn encode(&self, values: &[u32], out: &mut [u8]) -> usize;
    fn decode(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize;
    fn encode_zigzag(&self, values: &[u32], out: &mut [u8]) -> usize;
    fn decode_zigzag(&self, input: &[u8], n: usize, values: &mut [u32]) -> usize;
    fn encode_delta(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize;
    fn decode_delta(&self, previous: u32, input: &[u8], n: usize, values: &mut [u32]) -> usize;
    fn encode_delta_zigzag(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize;
    fn decode_delta_zigzag(&self, previous: u32, input: &[u8], n: usize, values: &mut [u32]) -> usize;
    fn encode_delta_transpose(&self, previous: u32, values: &[u32], out: &mut [u8]) -> usize;
    fn decode_delta_transpose(&self, previous: u32, input: &[u8], n: usize, values: &mut [u32]) -> usize;
}

define_coder!(Coder1234, format1234, CodingDescriptor1234);
define_coder!(Coder0124, format0124, CodingDescriptor0124);

macro_rules! flat_variant_fns {
    ($coder:ty, $enc:ident, $dec:ident, $enc_method:ident, $dec_method:ident) => {
        #[doc = concat!("Encodes with a default-constructed [`", stringify!($coder), "`].")]
        pub fn $enc(values: &[u32], out: &mut [u8]) -> usize {
            <$coder>::new().$enc_method(values, out)
        }

        #[doc = concat!("Decodes with a default-constructed [`", stringify!($coder), "`].")]
        pub fn $dec(input: &[u8], n: usize, values: &mut [u32]) -> usize {
            <$coder>::new().$dec_method(input, n, values)
        }
    };
}

macro_rules! flat_delta_variant_fns {
    ($coder:ty, $enc:ident, $dec:ident, $enc_method:ident, $dec_method:ident) => {
        #[doc = concat!("Encodes with a default-constructed [`", stringify!($coder), "`].")]
        pub fn $enc(previous: u32, values: &[u32], out: &mut [u8]) -> usize {
            <$coder>::new().$enc_method(previous, values, out)
        }

        #[doc = concat!("Decodes with a default-constructed [`", stringify!($coder), "`].")]
        pub fn $dec(previous: u32, input: &[u8], n: usize, values: &mut [u32]) -> usize {
            <$coder>::new().$dec_method(previous, input, n, values)
        }
    };
}

flat_variant_fns!(Coder1234, encode_1234, decode_1234, encode, decode);
flat_variant_fns!(Coder1234, encode_1234_z, decode_1234_z, encode_zigzag, decode_zigzag);
flat_delta_variant_fns!(Coder1234, encode_1234_d, decode_1234_d, encode_delta, decode_delta);
flat_delta_variant_fns!(
    Coder1234,
    encode_1234_dz,
    decode_1234_dz,
    encode_delta_zigzag,
    decode_delta_zigzag
);
flat_delta_variant_fns!(
    Coder1234,
    encode_1234_dt,
    decode_1234_dt,
    encode_delta_transpose,
    decode_delta_transpose
);

flat_variant_fns!(Coder0124, encode_0124, decode_0124, encode, decode);
flat_variant_fns!(Coder0124, encode_0124_z, decode_0124_z, encode_zigzag, decode_zigzag);
flat_delta_variant_fns!(Coder0124, encode_0124_d, decode_0124_d, encode_delta, decode_delta);
flat_delta_variant_fns!(
    Coder0124,
    encode_0124_dz,
    decode_0124_dz,
    encode_delta_zigzag,
    decode_delta_zigzag
);
flat_delta_variant_fns!(
    Coder0124,
    encode_0124_dt,
    decode_0124_dt,
    encode_delta_transpose,
    decode_delta_transpose
);

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bound_matches_spec_formula() {
        assert_eq!(bound(0), 0);
        assert_eq!(bound(1), 1 + 4);
        assert_eq!(bound(4), 1 + 16);
        assert_eq!(bound(5), 2 + 20);
    }

    #[test]
    fn coder1234_single_zero() {
        let coder = Coder1234::new();
        let mut out = [0xffu8; 2];
        let len = coder.encode(&[0], &mut out);
        assert_eq!(len, 2);
        assert_eq!(out, [0x00, 0x00]);
    }

    #[test]
    fn coder0124_single_zero() {
        let coder = Coder0124::new();
        let mut out = [0xffu8; 1];
        let len = coder.encode(&[0], &mut out);
        assert_eq!(len, 1);
        assert_eq!(out, [0x00]);
    }

    #[test]
    fn coder1234_four_ascending_powers() {
        let coder = Coder1234::new();
        let values = [1u32, 256, 65536, 16777216];
        let mut out = [0xffu8; 11];
        let len = coder.encode(&values, &mut out);
        assert_eq!(len, 11);
        assert_eq!(
            out,
            [0xE4, 0x01, 0x00, 0x01, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01]
        );

        let mut decoded = [0u32; 4];
        coder.decode(&out, 4, &mut decoded);
        assert_eq!(decoded, values);
    }

    #[test]
    fn coder0124_four_values() {
        let coder = Coder0124::new();
        let values = [0u32, 1, 258, 66051];
        let mut out = [0xffu8; 8];
        let len = coder.encode(&values, &mut out);
        assert_eq!(len, 8);
        assert_eq!(
            out,
            [0xE4, 0x01, 0x02, 0x01, 0x03, 0x02, 0x01, 0x00]
        );

        let mut decoded = [0u32; 4];
        coder.decode(&out, 4, &mut decoded);
        assert_eq!(decoded, values);
    }

    #[test]
    fn coder1234_delta_constant_stream() {
        let coder = Coder1234::new();
        let values = [42u32, 42, 42, 42];
        let mut out = [0xffu8; 5];
        let len = coder.encode_delta(42, &values, &mut out);
        assert_eq!(len, 5);
        assert_eq!(out, [0x00, 0x00, 0x00, 0x00, 0x00]);

        let mut decoded = [0u32; 4];
        coder.decode_delta(42, &out, 4, &mut decoded);
        assert_eq!(decoded, values);
    }

    #[test]
    fn coder1234_delta_transpose_shorter_than_base() {
        let coder = Coder1234::new();
        // Ascending but spaced widely enough that the raw values need multiple
        // payload bytes apiece, while the stride-4 delta streams dt produces
        // stay within a small, uniform step and so need fewer.
        let values: Vec<u32> = (0..128).map(|i| i * 10_000).collect();

        let mut base = vec![0u8; bound(values.len())];
        let base_len = coder.encode(&values, &mut base);

        let mut dt = vec![0u8; bound(values.len())];
        let dt_len = coder.encode_delta_transpose(0, &values, &mut dt);
        assert!(dt_len < base_len);

        let mut decoded = vec![0u32; values.len()];
        let read = coder.decode_delta_transpose(0, &dt[..dt_len], values.len(), &mut decoded);
        assert_eq!(read, dt_len);
        assert_eq!(decoded, values);
    }

    crate::tests::codec_test_suite!(Coder1234, coder1234_suite);
    crate::tests::codec_test_suite!(Coder0124, coder0124_suite);

    #[test]
    fn flat_functions_match_coder_methods() {
        let values = [1u32, 256, 65536, 16777216];
        let mut via_coder = [0u8; 11];
        Coder1234::new().encode(&values, &mut via_coder);
        let mut via_flat = [0u8; 11];
        encode_1234(&values, &mut via_flat);
        assert_eq!(via_coder, via_flat);

        let mut decoded = [0u32; 4];
        decode_1234(&via_flat, 4, &mut decoded);
        assert_eq!(decoded, values);
    }

    #[test]
    fn stream_codec_trait_object() {
        let coders: [Box<dyn StreamCodec>; 2] =
            [Box::new(Coder1234::new()), Box::new(Coder0124::new())];
        for coder in &coders {
            let values = [5u32, 10, 15, 20];
            let mut out = vec![0u8; bound(values.len())];
            let len = coder.encode(&values, &mut out);
            let mut decoded = [0u32; 4];
            coder.decode(&out[..len], 4, &mut decoded);
            assert_eq!(decoded, values);
        }
    }
}
