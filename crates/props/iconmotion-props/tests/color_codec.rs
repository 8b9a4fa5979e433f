use iconmotion_props::{hex_to_internal, internal_to_hex, normalize_color, PropsError};

fn channels(hex: &str) -> [i32; 3] {
    let d = hex.trim_start_matches('#');
    [
        i32::from_str_radix(&d[0..2], 16).unwrap(),
        i32::from_str_radix(&d[2..4], 16).unwrap(),
        i32::from_str_radix(&d[4..6], 16).unwrap(),
    ]
}

#[test]
fn documented_exact_values() {
    assert_eq!(hex_to_internal("#ff0000").unwrap(), [1.0, 0.0, 0.0]);
    assert_eq!(internal_to_hex(&[1.0, 0.0, 0.0]), "#ff0000");
    assert_eq!(internal_to_hex(&[0.0, 0.0, 0.0]), "#000000");
}

#[test]
fn quantized_to_three_decimals() {
    // 0x12 = 18 -> 18/255 = 0.070588 -> 0.071
    let c = hex_to_internal("#121331").unwrap();
    assert_eq!(c, [0.071, 0.075, 0.192]);
    assert_eq!(internal_to_hex(&c), "#121331");
}

#[test]
fn round_trip_stays_within_one_unit_per_channel() {
    for n in 0..=255u32 {
        let hex = format!("#{:02x}{:02x}{:02x}", n, 255 - n, (n * 7) % 256);
        let back = internal_to_hex(&hex_to_internal(&hex).unwrap());
        let (a, b) = (channels(&hex), channels(&back));
        for i in 0..3 {
            assert!((a[i] - b[i]).abs() <= 1, "{hex} -> {back}");
        }
    }
}

#[test]
fn alpha_and_out_of_range_are_tolerated() {
    assert_eq!(internal_to_hex(&[0.5, 0.5, 0.5, 0.2]), "#808080");
    assert_eq!(internal_to_hex(&[1.4, -0.2, 0.0]), "#ff0000");
    assert_eq!(internal_to_hex(&[1.0]), "#ff0000");
}

#[test]
fn named_and_shorthand_tokens_convert() {
    assert_eq!(hex_to_internal("red").unwrap(), [1.0, 0.0, 0.0]);
    assert_eq!(hex_to_internal("#0f0").unwrap(), [0.0, 1.0, 0.0]);
    assert_eq!(normalize_color("White").unwrap(), "#ffffff");
}

#[test]
fn unknown_tokens_fail_with_invalid_color() {
    assert_eq!(
        hex_to_internal("chartreusy"),
        Err(PropsError::InvalidColor("chartreusy".to_string()))
    );
    assert!(matches!(
        hex_to_internal("#12"),
        Err(PropsError::InvalidColor(_))
    ));
}
