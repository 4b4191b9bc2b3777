use partview::{
    material::{FLAKE_MAP_SIZE, flakes_normal_map},
    resources::environment::EnvironmentMap,
};

const NEUTRAL: [u8; 4] = [127, 127, 255, 255];

#[test]
fn should_generate_deterministic_flake_maps() {
    let a = flakes_normal_map(FLAKE_MAP_SIZE, FLAKE_MAP_SIZE, 42);
    let b = flakes_normal_map(FLAKE_MAP_SIZE, FLAKE_MAP_SIZE, 42);
    assert_eq!(a, b);

    let c = flakes_normal_map(FLAKE_MAP_SIZE, FLAKE_MAP_SIZE, 43);
    assert_ne!(a, c);
}

#[test]
fn should_keep_flake_normals_leaning_towards_plus_z() {
    let map = flakes_normal_map(64, 64, 7);
    assert_eq!(map.len(), 64 * 64 * 4);

    let mut neutral = 0usize;
    let mut flake = 0usize;
    for px in map.chunks_exact(4) {
        assert_eq!(px[3], 255);
        // Every texel, flake or background, encodes a normal with a clearly
        // positive Z component.
        assert!(px[2] > 127, "normal leans away from the surface: {px:?}");
        if *px == NEUTRAL {
            neutral += 1;
        } else {
            flake += 1;
        }
    }
    // The map is a sprinkle of discs over a neutral background, not a solid
    // fill and not empty.
    assert!(neutral > 0);
    assert!(flake > 0);
}

#[test]
fn should_box_filter_when_halving() {
    let map = EnvironmentMap {
        pixels: vec![
            [1.0, 0.0, 0.0, 1.0],
            [0.0, 1.0, 0.0, 1.0],
            [0.0, 0.0, 1.0, 1.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
        width: 2,
        height: 2,
    };

    let half = map.halved();
    assert_eq!((half.width, half.height), (1, 1));
    assert_eq!(half.pixels, vec![[0.25, 0.25, 0.25, 1.0]]);
}

#[test]
fn should_downsample_to_the_target_width() {
    let map = EnvironmentMap {
        pixels: vec![[0.5, 0.5, 0.5, 1.0]; 256 * 128],
        width: 256,
        height: 128,
    };

    let small = map.downsampled_to(64);
    assert_eq!((small.width, small.height), (64, 32));
    assert_eq!(small.pixels.len(), 64 * 32);
    // A constant panorama stays constant under the box filter.
    for p in &small.pixels {
        assert_eq!(*p, [0.5, 0.5, 0.5, 1.0]);
    }
}

#[test]
fn should_not_downsample_below_the_source_size() {
    let map = EnvironmentMap {
        pixels: vec![[1.0; 4]; 32 * 16],
        width: 32,
        height: 16,
    };
    let same = map.downsampled_to(64);
    assert_eq!((same.width, same.height), (32, 16));
}
