/// The 20-colour categorical palette ("tab20"), as 8-bit RGB.
const TAB20: [[u8; 3]; 20] = [
    [0x1f, 0x77, 0xb4], [0xae, 0xc7, 0xe8], [0xff, 0x7f, 0x0e], [0xff, 0xbb, 0x78],
    [0x2c, 0xa0, 0x2c], [0x98, 0xdf, 0x8a], [0xd6, 0x27, 0x28], [0xff, 0x98, 0x96],
    [0x94, 0x67, 0xbd], [0xc5, 0xb0, 0xd5], [0x8c, 0x56, 0x4b], [0xc4, 0x9c, 0x94],
    [0xe3, 0x77, 0xc2], [0xf7, 0xb6, 0xd2], [0x7f, 0x7f, 0x7f], [0xc7, 0xc7, 0xc7],
    [0xbc, 0xbd, 0x22], [0xdb, 0xdb, 0x8d], [0x17, 0xbe, 0xcf], [0x9e, 0xda, 0xe5],
];

/// RGB in `[0, 1]` for the topic at `rank`; wraps after 20.
pub fn color_for_rank(rank: usize) -> [f64; 3] {
    let [r, g, b] = TAB20[rank % TAB20.len()];
    [f64::from(r) / 255.0, f64::from(g) / 255.0, f64::from(b) / 255.0]
}
