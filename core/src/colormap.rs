use palette::Srgb;

// Perceptual colour ramp with nearest-entry lookup.
// No blending between neighbouring entries.
#[derive(Debug, Clone, Copy)]
pub struct ColorRamp {
    colors: &'static [[u8; 3]],
}

// Position used for every sample when a height range collapses to a point
pub const FLAT_RAMP_POSITION: f32 = 0.5;

impl ColorRamp {
    pub const PERCEPTUAL: ColorRamp = ColorRamp { colors: &PERCEPTUAL_TABLE };

    pub fn perceptual() -> &'static ColorRamp {
        &Self::PERCEPTUAL
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    // Index of the entry covering `t`; out-of-range and NaN inputs clamp to the ends
    pub fn index(&self, t: f32) -> usize {
        let n = self.colors.len();
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        ((t * n as f32) as usize).min(n - 1)
    }

    pub fn lookup(&self, t: f32) -> Srgb<u8> {
        let [r, g, b] = self.colors[self.index(t)];
        Srgb::new(r, g, b)
    }

    // Colour for height `h` normalised over [min, max]
    pub fn for_height(&self, h: f32, min: f32, max: f32) -> Srgb<u8> {
        let range = max - min;
        if range.abs() < f32::EPSILON {
            self.lookup(FLAT_RAMP_POSITION)
        } else {
            self.lookup((h - min) / range)
        }
    }
}

// Dark purple through teal to yellow, 256 entries, smooth polynomial fit
#[rustfmt::skip]
const PERCEPTUAL_TABLE: [[u8; 3]; 256] = [
    [71, 1, 85], [71, 3, 87], [71, 4, 88], [71, 6, 89],
    [71, 7, 91], [71, 8, 92], [71, 10, 93], [71, 11, 95],
    [72, 13, 96], [72, 14, 97], [72, 15, 99], [72, 17, 100],
    [72, 18, 101], [72, 20, 103], [72, 21, 104], [72, 22, 105],
    [72, 24, 106], [72, 25, 108], [72, 26, 109], [72, 28, 110],
    [72, 29, 111], [72, 31, 112], [72, 32, 113], [72, 33, 114],
    [72, 35, 116], [72, 36, 117], [72, 37, 118], [72, 39, 119],
    [71, 40, 120], [71, 41, 121], [71, 42, 121], [71, 44, 122],
    [71, 45, 123], [71, 46, 124], [71, 48, 125], [70, 49, 126],
    [70, 50, 127], [70, 51, 127], [70, 53, 128], [70, 54, 129],
    [69, 55, 129], [69, 56, 130], [69, 58, 131], [69, 59, 131],
    [68, 60, 132], [68, 61, 133], [68, 62, 133], [68, 63, 134],
    [67, 65, 134], [67, 66, 135], [67, 67, 135], [66, 68, 136],
    [66, 69, 136], [65, 70, 136], [65, 72, 137], [65, 73, 137],
    [64, 74, 138], [64, 75, 138], [63, 76, 138], [63, 77, 139],
    [63, 78, 139], [62, 79, 139], [62, 80, 139], [61, 81, 140],
    [61, 82, 140], [60, 84, 140], [60, 85, 140], [59, 86, 140],
    [59, 87, 141], [58, 88, 141], [58, 89, 141], [57, 90, 141],
    [57, 91, 141], [56, 92, 141], [56, 93, 141], [55, 94, 142],
    [54, 95, 142], [54, 96, 142], [53, 97, 142], [53, 98, 142],
    [52, 99, 142], [52, 100, 142], [51, 101, 142], [50, 102, 142],
    [50, 103, 142], [49, 104, 142], [49, 105, 142], [48, 106, 142],
    [48, 107, 142], [47, 108, 142], [46, 109, 142], [46, 110, 142],
    [45, 111, 142], [45, 112, 142], [44, 113, 142], [44, 114, 142],
    [43, 115, 142], [43, 116, 142], [42, 116, 142], [41, 117, 142],
    [41, 118, 142], [40, 119, 142], [40, 120, 142], [39, 121, 142],
    [39, 122, 142], [38, 123, 142], [38, 124, 141], [37, 125, 141],
    [37, 126, 141], [37, 127, 141], [36, 128, 141], [36, 129, 141],
    [35, 130, 141], [35, 131, 141], [34, 132, 141], [34, 133, 141],
    [34, 134, 141], [33, 134, 141], [33, 135, 140], [33, 136, 140],
    [33, 137, 140], [32, 138, 140], [32, 139, 140], [32, 140, 140],
    [32, 141, 140], [31, 142, 140], [31, 143, 139], [31, 144, 139],
    [31, 145, 139], [31, 146, 139], [31, 147, 139], [31, 148, 139],
    [31, 148, 138], [31, 149, 138], [31, 150, 138], [31, 151, 138],
    [31, 152, 137], [31, 153, 137], [31, 154, 137], [31, 155, 137],
    [32, 156, 136], [32, 157, 136], [32, 158, 136], [32, 159, 136],
    [33, 160, 135], [33, 161, 135], [33, 162, 135], [34, 162, 134],
    [34, 163, 134], [35, 164, 133], [35, 165, 133], [36, 166, 133],
    [37, 167, 132], [37, 168, 132], [38, 169, 131], [39, 170, 131],
    [39, 171, 130], [40, 172, 130], [41, 172, 129], [42, 173, 128],
    [43, 174, 128], [43, 175, 127], [44, 176, 127], [45, 177, 126],
    [46, 178, 125], [48, 179, 125], [49, 180, 124], [50, 180, 123],
    [51, 181, 122], [52, 182, 122], [53, 183, 121], [55, 184, 120],
    [56, 185, 119], [58, 186, 118], [59, 186, 117], [60, 187, 116],
    [62, 188, 115], [63, 189, 114], [65, 190, 113], [67, 191, 112],
    [68, 191, 111], [70, 192, 110], [72, 193, 109], [74, 194, 108],
    [75, 195, 107], [77, 195, 105], [79, 196, 104], [81, 197, 103],
    [83, 198, 102], [85, 198, 100], [87, 199, 99], [89, 200, 98],
    [91, 201, 96], [94, 201, 95], [96, 202, 94], [98, 203, 92],
    [100, 204, 91], [103, 204, 89], [105, 205, 88], [107, 206, 86],
    [110, 206, 85], [112, 207, 83], [115, 208, 82], [117, 208, 80],
    [120, 209, 78], [122, 210, 77], [125, 210, 75], [127, 211, 74],
    [130, 211, 72], [132, 212, 70], [135, 213, 69], [138, 213, 67],
    [141, 214, 65], [143, 214, 64], [146, 215, 62], [149, 215, 61],
    [152, 216, 59], [154, 217, 57], [157, 217, 56], [160, 218, 54],
    [163, 218, 52], [166, 219, 51], [168, 219, 49], [171, 220, 48],
    [174, 220, 46], [177, 220, 45], [180, 221, 43], [183, 221, 42],
    [186, 222, 41], [188, 222, 39], [191, 223, 38], [194, 223, 37],
    [197, 223, 36], [200, 224, 35], [202, 224, 33], [205, 225, 32],
    [208, 225, 32], [210, 225, 31], [213, 226, 30], [216, 226, 29],
    [218, 226, 29], [221, 227, 28], [224, 227, 28], [226, 227, 27],
    [228, 228, 27], [231, 228, 27], [233, 228, 27], [236, 229, 27],
    [238, 229, 27], [240, 229, 28], [242, 230, 28], [244, 230, 29],
    [246, 230, 30], [248, 231, 31], [250, 231, 32], [252, 231, 33],
];
