#[cfg(target_arch = "x86_64")]
mod ssse3;

use crate::coder_impl;
use crate::coding_descriptor::CodingDescriptor;
use crate::tile;

#[derive(Copy, Clone, Debug)]
pub(crate) struct CodingDescriptor1234;

impl CodingDescriptor for CodingDescriptor1234 {
    type Elem = u32;

    const TAG_LEN: [usize; 4] = [1, 2, 3, 4];
    const TAG_MAX: [Self::Elem; 4] = crate::tag_utils::tag_mask_table32(Self::TAG_LEN);

    #[inline]
    fn tag_value(value: Self::Elem) -> (u8, usize) {
        let tag = 3u32.saturating_sub(value.leading_zeros() / 8);
        (tag as u8, tag as usize + 1)
    }

    #[inline(always)]
    fn data_len(tag: u8) -> usize {
        LENGTH_TABLE[tag as usize] as usize
    }
}
const LENGTH_TABLE: [u8; 256] = crate::tag_utils::tag_length_table(CodingDescriptor1234::TAG_LEN);

pub(crate) mod scalar {
    pub(crate) type RawGroupImpl =
        crate::raw_group::scalar::ScalarRawGroupImpl<super::CodingDescriptor1234>;

    #[cfg(test)]
    crate::tests::raw_group_test_suite!();
}

/// Key length table for this format, `1` through `4` bytes per value.
pub(crate) const TAG_LEN: [usize; 4] = CodingDescriptor1234::TAG_LEN;

#[derive(Clone, Copy)]
pub(crate) enum Impl {
    Scalar,
    #[cfg(target_arch = "x86_64")]
    Ssse3,
}

impl Impl {
    pub(crate) fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            if std::arch::is_x86_feature_detected!("ssse3") {
                return Impl::Ssse3;
            }
        }
        Impl::Scalar
    }
}

pub(crate) fn encode(imp: Impl, values: &[u32], tags: &mut [u8], data: &mut [u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::encode::<scalar::RawGroupImpl>(values, tags, data),
        #[cfg(target_arch = "x86_64")]
        Impl::Ssse3 => coder_impl::encode::<ssse3::RawGroupImpl>(values, tags, data),
    }
}

pub(crate) fn encode_zigzag(imp: Impl, values: &[u32], tags: &mut [u8], data: &mut [u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::encode_zigzag::<scalar::RawGroupImpl>(values, tags, data),
        #[cfg(target_arch = "x86_64")]
        Impl::Ssse3 => coder_impl::encode_zigzag::<ssse3::RawGroupImpl>(values, tags, data),
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
        Impl::Ssse3 => coder_impl::encode_deltas::<ssse3::RawGroupImpl>(initial, values, tags, data),
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
        Impl::Ssse3 => {
            coder_impl::encode_deltas_zigzag::<ssse3::RawGroupImpl>(initial, values, tags, data)
        }
    }
}

pub(crate) fn decode(imp: Impl, tags: &[u8], data: &[u8], values: &mut [u32]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::decode::<scalar::RawGroupImpl>(tags, data, values),
        #[cfg(target_arch = "x86_64")]
        Impl::Ssse3 => coder_impl::decode::<ssse3::RawGroupImpl>(tags, data, values),
    }
}

pub(crate) fn decode_zigzag(imp: Impl, tags: &[u8], data: &[u8], values: &mut [u32]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::decode_zigzag::<scalar::RawGroupImpl>(tags, data, values),
        #[cfg(target_arch = "x86_64")]
        Impl::Ssse3 => coder_impl::decode_zigzag::<ssse3::RawGroupImpl>(tags, data, values),
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
        Impl::Ssse3 => coder_impl::decode_deltas::<ssse3::RawGroupImpl>(initial, tags, data, values),
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
        Impl::Ssse3 => {
            coder_impl::decode_deltas_zigzag::<ssse3::RawGroupImpl>(initial, tags, data, values)
        }
    }
}

pub(crate) fn data_len(imp: Impl, tags: &[u8]) -> usize {
    match imp {
        Impl::Scalar => coder_impl::data_len::<scalar::RawGroupImpl>(tags),
        #[cfg(target_arch = "x86_64")]
        Impl::Ssse3 => coder_impl::data_len::<ssse3::RawGroupImpl>(tags),
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
        Impl::Ssse3 => tile::encode::<ssse3::RawGroupImpl>(previous, values, tags, data),
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
        Impl::Ssse3 => tile::decode::<ssse3::RawGroupImpl>(previous, tags, data, values),
    }
}
