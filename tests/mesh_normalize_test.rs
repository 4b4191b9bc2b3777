use partview::data_structures::geometry::MeshData;

fn close(a: f32, b: f32) -> bool {
    (a - b).abs() < 1e-5
}

fn close3(a: [f32; 3], b: [f32; 3]) -> bool {
    close(a[0], b[0]) && close(a[1], b[1]) && close(a[2], b[2])
}

/// A single unindexed triangle with no UVs, the worst case an export can be.
fn bare_triangle() -> MeshData {
    MeshData::new(
        "triangle",
        vec![[0.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 2.0, 0.0]],
    )
}

#[test]
fn should_recenter_to_bounding_box_center() {
    let mut mesh = bare_triangle();
    // Bounding box [0, 2] x [0, 2] x [0, 0], so the center is (1, 1, 0).
    let translation = mesh.recenter();
    assert!(close(translation.x, -1.0));
    assert!(close(translation.y, -1.0));
    assert!(close(translation.z, 0.0));

    let (min, max) = mesh.bounding_box().unwrap();
    for axis in 0..3 {
        assert!(close((min[axis] + max[axis]) / 2.0, 0.0));
    }
}

#[test]
fn should_synthesize_uvs_from_recentered_positions() {
    let mut mesh = bare_triangle();
    mesh.normalize();

    // Positions after recentering are (-1,-1,0), (1,-1,0), (-1,1,0); the
    // fallback projection is ((x + 0.1) / 2, (y + 0.1) / 2).
    let uvs = mesh.uvs.as_ref().expect("normalize synthesizes UVs");
    let expected = [[-0.45, -0.45], [0.55, -0.45], [-0.45, 0.55]];
    for (uv, want) in uvs.iter().zip(expected) {
        assert!(close(uv[0], want[0]), "got {uv:?}, want {want:?}");
        assert!(close(uv[1], want[1]), "got {uv:?}, want {want:?}");
    }
}

#[test]
fn should_keep_existing_uvs() {
    let mut mesh = bare_triangle();
    let authored = vec![[0.25, 0.75], [0.5, 0.5], [0.75, 0.25]];
    mesh.uvs = Some(authored.clone());

    mesh.normalize();

    assert_eq!(mesh.uvs, Some(authored));
}

#[test]
fn should_recompute_normals_for_unindexed_triangles() {
    let mut mesh = bare_triangle();
    mesh.normalize();

    // Counter-clockwise in the X-Y plane faces +Z.
    for n in &mesh.normals {
        assert!(close3(*n, [0.0, 0.0, 1.0]), "got {n:?}");
    }
}

#[test]
fn should_skip_tangents_without_indices() {
    let mut mesh = bare_triangle();
    mesh.normalize();

    // No index list means no tangent pass; the zeroed tangents stay.
    for (t, b) in mesh.tangents.iter().zip(&mesh.bitangents) {
        assert!(close3(*t, [0.0; 3]));
        assert!(close3(*b, [0.0; 3]));
    }
}

#[test]
fn should_compute_tangents_for_indexed_meshes() {
    // A unit quad in the X-Y plane whose UVs equal its X/Y coordinates.
    let mut mesh = MeshData::new(
        "quad",
        vec![
            [0.0, 0.0, 0.0],
            [1.0, 0.0, 0.0],
            [1.0, 1.0, 0.0],
            [0.0, 1.0, 0.0],
        ],
    );
    mesh.uvs = Some(vec![[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
    mesh.indices = Some(vec![0, 1, 2, 0, 2, 3]);

    assert!(mesh.compute_tangents());

    // U runs along +X, so the tangent is +X; the bitangent is flipped for
    // the wgpu texture coordinate convention and runs along -Y.
    assert!(close3(mesh.tangents[0], [1.0, 0.0, 0.0]), "{:?}", mesh.tangents[0]);
    assert!(
        close3(mesh.bitangents[0], [0.0, -1.0, 0.0]),
        "{:?}",
        mesh.bitangents[0]
    );
}

#[test]
fn should_ignore_degenerate_uv_triangles() {
    // All three UVs collapse to a point; the solve has no solution and the
    // triangle must contribute nothing rather than NaNs.
    let mut mesh = bare_triangle();
    mesh.uvs = Some(vec![[0.5, 0.5]; 3]);
    mesh.indices = Some(vec![0, 1, 2]);

    assert!(mesh.compute_tangents());
    for t in &mesh.tangents {
        assert!(close3(*t, [0.0; 3]));
        assert!(t.iter().all(|v| v.is_finite()));
    }
}

#[test]
fn should_handle_empty_meshes() {
    let mut mesh = MeshData::new("empty", Vec::new());
    assert!(mesh.bounding_box().is_none());
    // Must not panic on any stage.
    mesh.normalize();
    assert_eq!(mesh.num_elements(), 0);
}

#[test]
fn should_count_elements_from_indices_when_present() {
    let mut mesh = bare_triangle();
    assert_eq!(mesh.num_elements(), 3);
    mesh.indices = Some(vec![0, 1, 2, 2, 1, 0]);
    assert_eq!(mesh.num_elements(), 6);
}
