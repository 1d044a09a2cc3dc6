//! Subsetting a minimal TrueType font built in memory.

use fontsieve_font_subsetter::Subsetter;
use read_fonts::{FontRef, TableProvider};
use write_fonts::{
    FontBuilder,
    tables::{
        cmap::Cmap,
        glyf::{Bbox, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        loca::LocaFormat,
        maxp::Maxp,
        post::Post,
    },
};

/// A font with one empty glyph per character of `chars` (all distinct), plus `.notdef`.
fn make_test_font(chars: &str) -> Vec<u8> {
    let num_glyphs = chars.chars().count() as u16 + 1;

    let mut glyf_builder = GlyfLocaBuilder::new();
    for _ in 0..num_glyphs {
        let simple = SimpleGlyph {
            bbox: Bbox { x_min: 0, y_min: 0, x_max: 500, y_max: 700 },
            contours: vec![],
            instructions: vec![],
        };
        glyf_builder.add_glyph(&Glyph::Simple(simple)).unwrap();
    }
    let (glyf, loca, loca_format) = glyf_builder.build();

    let mappings = chars
        .chars()
        .enumerate()
        .map(|(i, c)| (c, font_types::GlyphId::new(i as u32 + 1)));
    let cmap = Cmap::from_mappings(mappings).expect("cmap");

    let head = Head {
        font_revision: font_types::Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::empty(),
        units_per_em: 1000,
        created: font_types::LongDateTime::new(0),
        modified: font_types::LongDateTime::new(0),
        x_min: 0,
        y_min: 0,
        x_max: 500,
        y_max: 700,
        mac_style: MacStyle::empty(),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: match loca_format {
            LocaFormat::Short => 0,
            LocaFormat::Long => 1,
        },
    };

    let hhea = Hhea {
        ascender: font_types::FWord::new(700),
        descender: font_types::FWord::new(-200),
        line_gap: font_types::FWord::new(0),
        advance_width_max: font_types::UfWord::new(500),
        min_left_side_bearing: font_types::FWord::new(0),
        min_right_side_bearing: font_types::FWord::new(0),
        x_max_extent: font_types::FWord::new(500),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };

    let hmtx = Hmtx {
        h_metrics: (0..num_glyphs).map(|_| LongMetric { advance: 500, side_bearing: 0 }).collect(),
        left_side_bearings: vec![],
    };

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(0),
        max_contours: Some(0),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(1),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let post = Post {
        version: font_types::Version16Dot16::VERSION_3_0,
        italic_angle: font_types::Fixed::from_f64(0.0),
        underline_position: font_types::FWord::new(-100),
        underline_thickness: font_types::FWord::new(50),
        is_fixed_pitch: 0,
        min_mem_type42: 0,
        max_mem_type42: 0,
        min_mem_type1: 0,
        max_mem_type1: 0,
        num_glyphs: Some(num_glyphs),
        glyph_name_index: None,
        string_data: None,
    };

    let mut builder = FontBuilder::new();
    builder.add_table(&head).unwrap();
    builder.add_table(&hhea).unwrap();
    builder.add_table(&hmtx).unwrap();
    builder.add_table(&maxp).unwrap();
    builder.add_table(&cmap).unwrap();
    builder.add_table(&post).unwrap();
    builder.add_table(&glyf).unwrap();
    builder.add_table(&loca).unwrap();
    builder.build()
}

fn mapped(font: &[u8], c: char) -> bool {
    let font = FontRef::new(font).expect("parse subset");
    font.cmap().expect("cmap").map_codepoint(c).is_some()
}

#[test]
fn test_subset_keeps_only_requested_chars() {
    let font = make_test_font("ABC字");
    let subset = Subsetter::new().with_text("A字").subset(&font).expect("subset failed");

    assert!(mapped(&subset, 'A'));
    assert!(mapped(&subset, '字'));
    assert!(!mapped(&subset, 'B'));
    assert!(!mapped(&subset, 'C'));

    let num_glyphs = FontRef::new(&subset).unwrap().maxp().unwrap().num_glyphs();
    assert_eq!(num_glyphs, 3);
}

#[test]
fn test_excluded_codepoints_are_dropped() {
    let font = make_test_font("AB\u{F8FF}");
    let subset = Subsetter::new()
        .with_text("AB\u{F8FF}")
        .exclude_codepoints([0xF8FF])
        .subset(&font)
        .expect("subset failed");

    assert!(mapped(&subset, 'A'));
    assert!(mapped(&subset, 'B'));
    assert!(!mapped(&subset, '\u{F8FF}'));
}

#[test]
fn test_subset_is_deterministic() {
    let font = make_test_font("ABCDEF");
    let subsetter = Subsetter::new().with_text("FACE");
    assert_eq!(subsetter.subset(&font).unwrap(), subsetter.subset(&font).unwrap());
}
