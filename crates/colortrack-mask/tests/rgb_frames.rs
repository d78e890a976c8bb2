use colortrack_core::{rgb_to_hsv, HsvImage};
use colortrack_mask::preprocess::preprocess;
use colortrack_mask::{
    build_mask, sample_rgb, threshold, ClaheParams, CustomColorProfile, MaskBuilder,
    MorphologyParams, PreprocessParams, RangeTable, ThresholdMode,
};
use image::{Rgb, RgbImage};

fn scene() -> RgbImage {
    RgbImage::from_fn(120, 80, |x, y| match (x, y) {
        (10..=39, 10..=39) => Rgb([20, 40, 220]),  // blue
        (50..=79, 10..=39) => Rgb([240, 220, 20]), // yellow
        (90..=109, 10..=59) => Rgb([230, 10, 25]), // red, hue just below 180
        (85, 70) => Rgb([20, 40, 220]),            // blue speckle
        _ => Rgb([90, 90, 90]),
    })
}

fn count(mask: &image::GrayImage) -> usize {
    mask.pixels().filter(|p| p[0] == 255).count()
}

#[test]
fn preset_modes_pick_their_patch() {
    let hsv = HsvImage::from_rgb(&scene());
    let table = RangeTable::default();

    let mask_for = |mode: ThresholdMode| {
        let range = table.resolve(mode).expect("preset range");
        build_mask(&hsv.view(), &range).expect("mask")
    };

    let blue = mask_for(ThresholdMode::Blue);
    assert_eq!(count(&blue), 900);
    assert_eq!(blue.get_pixel(85, 70)[0], 0);

    let yellow = mask_for(ThresholdMode::Yellow);
    assert_eq!(count(&yellow), 900);
    assert_eq!(yellow.get_pixel(60, 20)[0], 255);

    let red = mask_for(ThresholdMode::Red);
    assert_eq!(count(&red), 20 * 50);
    assert_eq!(table.resolve(ThresholdMode::None), None);
}

#[test]
fn raw_threshold_keeps_speckle() {
    let hsv = HsvImage::from_rgb(&scene());
    let blue = colortrack_mask::BLUE;
    let raw = threshold(&hsv.view(), &blue).expect("threshold");
    assert_eq!(count(&raw), 901);
    let builder = MaskBuilder::new(MorphologyParams::disabled());
    let undenoised = builder.build(&hsv.view(), &blue).expect("mask");
    assert_eq!(count(&undenoised), 901);
}

#[test]
fn sampled_custom_range_selects_sampled_patch() {
    let frame = scene();
    let sample = sample_rgb(&frame, 20, 20).expect("inside");
    assert_eq!(sample, rgb_to_hsv(20, 40, 220));

    let custom = CustomColorProfile::default().with_sample(sample);
    let table = RangeTable::default().with_custom(custom);
    let range = table.resolve(ThresholdMode::Custom).expect("custom");
    let mask = build_mask(&HsvImage::from_rgb(&frame).view(), &range).expect("mask");
    assert_eq!(count(&mask), 900);
}

#[test]
fn preprocessing_keeps_solid_patches_detectable() {
    let params = PreprocessParams {
        blur_sigma: 1.5,
        clahe: Some(ClaheParams::default()),
    };
    let hsv = preprocess(&scene(), &params);
    let mask = build_mask(&hsv.view(), &colortrack_mask::YELLOW).expect("mask");
    assert_eq!(mask.get_pixel(65, 25)[0], 255);
    assert_eq!(mask.get_pixel(20, 20)[0], 0);
    let n = count(&mask);
    assert!((700..=1200).contains(&n), "yellow pixels {n}");
}
