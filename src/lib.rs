/*! # StreamVByte integer coding
This crate implements the [StreamVByte](https://github.com/lemire/streamvbyte) family of
byte-aligned codecs for streams of `u32` values: a two-bit "key" per value packed four to a
byte, followed by 0-4 payload bytes per value as the key dictates.

Two key formats are provided. `Coder1234` stores each value in 1, 2, 3, or 4 bytes; `Coder0124`
additionally allows a zero-byte key for values that are always zero (handy for sparse streams).
Both formats support the same five preprocessing variants, chosen by which method pair you call:

- base (`encode`/`decode`) — values coded as-is.
- zig-zag (`encode_zigzag`/`decode_zigzag`) — for streams of small-magnitude signed deltas
  packed into `u32` via two's complement, so small negative values still code small.
- delta (`encode_delta`/`decode_delta`) — values coded as the difference from the previous
  value, seeded by a caller-supplied `previous`.
- delta then zig-zag (`encode_delta_zigzag`/`decode_delta_zigzag`) — for streams that are
  mostly increasing but occasionally decrease.
- delta then transpose (`encode_delta_transpose`/`decode_delta_transpose`) — regroups 64-element
  tiles before delta coding so that values at the same position across nearby groups, which tend
  to be close in magnitude, end up adjacent.

A scalar implementation is always available; an accelerated SSSE3 (`Coder1234`) or SSE4.1
(`Coder0124`) implementation is selected automatically at runtime when the host CPU supports it.

Every encode method writes into a single buffer sized by [`bound`]; the key block (one byte per
four values) precedes the data block with no padding. Every decode method takes the element count
`n` out-of-band, since the stream itself does not record it.

## Example without delta-coding

```
use streamvbyte::{bound, Coder1234};

let coder = Coder1234::new();
let values = vec![
    0u32, 128, 256, 1024, 70, 36, 1000000,
    378, 45, 888, 26, 262144, 88, 89, 90, 16777216
];
let mut encoded = vec![0u8; bound(values.len())];
let encoded_len = coder.encode(&values, &mut encoded);

let mut decoded = vec![0u32; values.len()];
coder.decode(&encoded[..encoded_len], values.len(), &mut decoded);
assert_eq!(values, decoded);
```

## Example with delta coding

```
use streamvbyte::{bound, Coder1234};

let coder = Coder1234::new();
let mut sum = 0u32;
let values = [
    0u32, 128, 256, 1024, 70, 36, 1000000,
    378, 45, 888, 26, 262144, 88, 89, 90, 16777216
].iter().map(|x| {
    sum += x;
    sum
}).collect::<Vec<_>>();
let mut plain = vec![0u8; bound(values.len())];
let plain_len = coder.encode(&values, &mut plain);

// encode_delta()/decode_delta() both accept an initial value subtracted from or added to
// every value in the stream. At the start of a stream this is usually zero but may be
// non-zero if you're encoding/decoding in the middle of one.
let mut delta = vec![0u8; bound(values.len())];
let delta_len = coder.encode_delta(0, &values, &mut delta);
// Fewer bytes are written with delta coding since only the distance between consecutive
// values is recorded, not the values themselves.
assert!(delta_len < plain_len);

let mut decoded = vec![0u32; values.len()];
coder.decode_delta(0, &delta[..delta_len], values.len(), &mut decoded);
assert_eq!(values, decoded);
```
*/

mod arch;
mod coder_impl;
mod coding_descriptor;
mod preprocess;
mod raw_group;
mod tag_utils;
mod tile;

mod format0124;
mod format1234;

mod codec;

pub use codec::{
    bound, decode_0124, decode_0124_d, decode_0124_dt, decode_0124_dz, decode_0124_z, decode_1234,
    decode_1234_d, decode_1234_dt, decode_1234_dz, decode_1234_z, encode_0124, encode_0124_d,
    encode_0124_dt, encode_0124_dz, encode_0124_z, encode_1234, encode_1234_d, encode_1234_dt,
    encode_1234_dz, encode_1234_z, Coder0124, Coder1234, StreamCodec,
};

#[cfg(test)]
pub(crate) mod tests;
