//! Delta-transpose (`dt`) tile orchestration.
//!
//! A tile is 64 elements, i.e. 16 groups of 4. The 16 groups are split into
//! four 4x4 sub-matrices of *consecutive* groups (0-3, 4-7, 8-11, 12-15),
//! each transposed in place with [`RawGroup::transpose4`]. The transposed
//! groups are then visited column-major across the four sub-matrices: for
//! column `c` in `0..4`, sub-matrix 0's column `c`, then sub-matrix 1's, and
//! so on. That walk reconstructs the four stride-4 streams of 16 elements
//! each that span the full tile, and every group along a given stream is
//! delta-coded against the previous group in that same stream, so the four
//! streams never bleed into one another. Each stream keeps its own running
//! seed across tiles, continuing from that stream's own last value in the
//! previous tile; the seed fed in from outside the tile path is broadcast to
//! all four streams for the first tile.
//!
//! `transpose4` is its own inverse, so decode applies it a second time to
//! restore the original group order.

use crate::raw_group::RawGroup;

pub(crate) const TILE_LEN: usize = 64;
const GROUPS_PER_TILE: usize = TILE_LEN / 4;
const SUBMATRIX_GROUPS: [[usize; 4]; 4] = [[0, 1, 2, 3], [4, 5, 6, 7], [8, 9, 10, 11], [12, 13, 14, 15]];

/// Encodes full 64-element tiles from `values`, returning the number of
/// bytes written to `data` and the new running delta seed.
///
/// `values.len()` must be a multiple of 64; `tags` must hold one byte per
/// group of 4.
pub(crate) fn encode<G: RawGroup<Elem = u32>>(
    previous: u32,
    values: &[u32],
    tags: &mut [u8],
    data: &mut [u8],
) -> (usize, u32) {
    assert_eq!(values.len() % TILE_LEN, 0);
    assert!(tags.len() >= values.len() / 4);

    let mut col_seed = [previous; 4];
    let mut written = 0usize;
    let mut tag_index = 0usize;

    for tile in values.chunks_exact(TILE_LEN) {
        let groups: Vec<G> = tile
            .chunks_exact(4)
            .map(|g| unsafe { G::load_unaligned(g.as_ptr()) })
            .collect();
        debug_assert_eq!(groups.len(), GROUPS_PER_TILE);

        let subs: Vec<[G; 4]> = SUBMATRIX_GROUPS
            .iter()
            .map(|rows| G::transpose4([groups[rows[0]], groups[rows[1]], groups[rows[2]], groups[rows[3]]]))
            .collect();

        for (c, seed) in col_seed.iter_mut().enumerate() {
            for sub in subs.iter() {
                let group = sub[c];
                let base = G::set1(*seed);
                let (tag, len) = unsafe { G::encode_deltas(data.as_mut_ptr().add(written), base, group) };
                tags[tag_index] = tag;
                written += len;
                tag_index += 1;

                let mut buf = [0u32; 4];
                unsafe { G::store_unaligned(buf.as_mut_ptr(), group) };
                *seed = buf[3];
            }
        }
    }

    (written, col_seed[3])
}

/// Inverse of [`encode`]: decodes full 64-element tiles from `tags`/`data`
/// into `values`, returning the number of bytes read from `data` and the new
/// running delta seed.
pub(crate) fn decode<G: RawGroup<Elem = u32>>(
    previous: u32,
    tags: &[u8],
    data: &[u8],
    values: &mut [u32],
) -> (usize, u32) {
    assert_eq!(values.len() % TILE_LEN, 0);
    assert!(tags.len() >= values.len() / 4);

    let mut col_seed = [previous; 4];
    let mut read = 0usize;
    let mut tag_index = 0usize;

    for tile_out in values.chunks_exact_mut(TILE_LEN) {
        let mut subs = [[G::set1(0); 4]; 4];

        for (c, seed) in col_seed.iter_mut().enumerate() {
            for sub in subs.iter_mut() {
                let tag = tags[tag_index];
                let base = G::set1(*seed);
                let (len, group) = unsafe { G::decode_deltas(data.as_ptr().add(read), tag, base) };
                read += len;
                tag_index += 1;

                let mut buf = [0u32; 4];
                unsafe { G::store_unaligned(buf.as_mut_ptr(), group) };
                *seed = buf[3];

                sub[c] = group;
            }
        }

        for (s, rows) in SUBMATRIX_GROUPS.iter().enumerate() {
            let restored = G::transpose4(subs[s]);
            for (i, &row_idx) in rows.iter().enumerate() {
                unsafe { G::store_unaligned(tile_out.as_mut_ptr().add(row_idx * 4), restored[i]) };
            }
        }
    }

    (read, col_seed[3])
}
