#[cfg(target_arch = "x86_64")]
mod sse41;

use crate::coder_impl;
use crate::coding_descriptor::CodingDescriptor;
use crate::tile;

#[derive(Copy, Clone, Debug)]
pub(crate) struct CodingDescriptor0124;

impl CodingDescriptor for CodingDescriptor0124 {
    type Elem = u32;

    const TAG_LEN: [usize; 4] = [0, 1, 2, 4];
    const TAG_MAX: [Self::Elem; 4] = crate::tag_utils::tag_mask_table32(Self::TAG_LEN);

    #[inline]
    fn tag_value(value: Self::Elem) -> (u8, usize) {
        let tag = TAG_VALUE_MAP[4 - (value.leading_zeros() as usize / 8)];
        (tag as u8, Self::TAG_LEN[tag])
    }

    #[inline(always)]
    fn data_len(tag: u8) -> usize {
        LENGTH_TABLE[tag as usize] as usize
    }
}
const LENGTH_TABLE: [u8; 256] = crate::tag_utils::tag_length_table(CodingDescriptor0124::TAG_LEN);
const TAG_VALUE_MAP: [usize; 5] = [0, 1, 2, 3, 3];

pub(crate) mod scalar {
    use super::CodingDescriptor0124;

    pub(crate) type RawGroupImpl =
        crate::raw_group::scalar::ScalarRawGroupImpl<CodingDescriptor0124>;

    #[cfg(test)]
    crate::tests::raw_group_test_suite!();
}

/// Key length table for this format: `0`, `1`, `2`, or `4` bytes per value.
pub(crate) const TAG_LEN: [usize; 4] = CodingDescriptor0124::TAG_LEN;

#[derive(Clone, Copy)]
pub(crate) enum Impl {
    Scalar,
    #[cfg(target_arch = "x86_64")]
    Sse41,
}

impl Impl {
    pub(crate) fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("sse4.1") {
                return Impl::Sse41;
            }
        }
        Impl::Scalar
    }
}

pub(crate) fn encode(imp: Impl, values: &[u32], tags: &mut [u8], data: &mut [u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::encode::<scalar::RawGroupImpl>(values, tags, data),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::encode::<sse41::RawGroupImpl>(values, tags, data),
    }
}

pub(crate) fn encode_zigzag(imp: Impl, values: &[u32], tags: &mut [u8], data: &mut [u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::encode_zigzag::<scalar::RawGroupImpl>(values, tags, data),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::encode_zigzag::<sse41::RawGroupImpl>(values, tags, data),
    }
}

pub(crate) fn encode_deltas(
    imp: Impl,
    initial: u32,
    values: &[u32],
    tags: &mut [u8],
    data: &mut [u8],
) -> usize {
    match imp {
        Impl::Scalar => {
            coder_impl::encode_deltas::<scalar::RawGroupImpl>(initial, values, tags, data)
        }
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::encode_deltas::<sse41::RawGroupImpl>(initial, values, tags, data),
    }
}

pub(crate) fn encode_deltas_zigzag(
    imp: Impl,
    initial: u32,
    values: &[u32],
    tags: &mut [u8],
    data: &mut [u8],
) -> usize {
    match imp {
        Impl::Scalar => {
            coder_impl::encode_deltas_zigzag::<scalar::RawGroupImpl>(initial, values, tags, data)
        }
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => {
            coder_impl::encode_deltas_zigzag::<sse41::RawGroupImpl>(initial, values, tags, data)
        }
    }
}

pub(crate) fn decode(imp: Impl, tags: &[u8], data: &[u8], values: &mut [u32]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::decode::<scalar::RawGroupImpl>(tags, data, values),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::decode::<sse41::RawGroupImpl>(tags, data, values),
    }
}

pub(crate) fn decode_zigzag(imp: Impl, tags: &[u8], data: &[u8], values: &mut [u32]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::decode_zigzag::<scalar::RawGroupImpl>(tags, data, values),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::decode_zigzag::<sse41::RawGroupImpl>(tags, data, values),
    }
}

pub(crate) fn decode_deltas(
    imp: Impl,
    initial: u32,
    tags: &[u8],
    data: &[u8],
    values: &mut [u32],
) -> usize {
    match imp {
        Impl::Scalar => {
            coder_impl::decode_deltas::<scalar::RawGroupImpl>(initial, tags, data, values)
        }
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::decode_deltas::<sse41::RawGroupImpl>(initial, tags, data, values),
    }
}

pub(crate) fn decode_deltas_zigzag(
    imp: Impl,
    initial: u32,
    tags: &[u8],
    data: &[u8],
    values: &mut [u32],
) -> usize {
    match imp {
        Impl::Scalar => {
            coder_impl::decode_deltas_zigzag::<scalar::RawGroupImpl>(initial, tags, data, values)
        }
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => {
            coder_impl::decode_deltas_zigzag::<sse41::RawGroupImpl>(initial, tags, data, values)
        }
    }
}

pub(crate) fn data_len(imp: Impl, tags: &[u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::data_len::<scalar::RawGroupImpl>(tags),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => coder_impl::data_len::<sse41::RawGroupImpl>(tags),
    }
}

pub(crate) fn encode_delta_transpose(
    imp: Impl,
    previous: u32,
    values: &[u32],
    tags: &mut [u8],
    data: &mut [u8],
) -> (usize, u32) {
    match imp {
        Impl::Scalar => tile::encode::<scalar::RawGroupImpl>(previous, values, tags, data),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => tile::encode::<sse41::RawGroupImpl>(previous, values, tags, data),
    }
}

pub(crate) fn decode_delta_transpose(
    imp: Impl,
    previous: u32,
    tags: &[u8],
    data: &[u8],
    values: &mut [u32],
) -> (usize, u32) {
    match imp {
        Impl::Scalar => tile::decode::<scalar::RawGroupImpl>(previous, tags, data, values),
        #[cfg(target_arch = "x86_64")]
        Impl::Sse41 => tile::decode::<sse41::RawGroupImpl>(previous, tags, data, values),
    }
}
