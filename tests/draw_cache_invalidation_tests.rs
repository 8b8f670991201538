//! Process-wide Draw Cache Invalidation Tests
//!
//! `invalidate_draw_caches` bumps a global epoch that every context cache
//! observes. Kept in its own test binary (and a single test) so the global
//! reset cannot race the skip assertions of other tests.

use std::sync::Arc;

use myth_mesh::{
    AttributeBuffer, AttributeType, BufferChunk, BufferHandle, Geometry, GraphicsContext,
    IndicesBuffer, Material, Mesh, RecordingContext, Shader, invalidate_draw_caches,
};

fn shader(name: &str) -> Arc<Shader> {
    Arc::new(
        Shader::builder(name)
            .attribute("position", 0, AttributeType::Float, 3)
            .build(),
    )
}

fn triangle(ctx: &RecordingContext) -> Arc<Geometry> {
    let chunk = BufferChunk::new()
        .with_attribute(
            "position",
            AttributeBuffer::new(BufferHandle(1), AttributeType::Float, 3),
        )
        .with_indices(IndicesBuffer {
            buffer: BufferHandle(2),
            count: 3,
        });
    Arc::new(Geometry::indexed("triangle", 3, 1).with_buffer_chunks(ctx.id(), vec![chunk]))
}

#[test]
fn global_reset_reaches_every_context() {
    let _ = env_logger::builder().is_test(true).try_init();

    let mut a = RecordingContext::new();
    let mut b = RecordingContext::new();
    let shared = shader("shared");
    let mut mesh_a = Mesh::new(triangle(&a), Arc::new(Material::new("a", shared.clone())));
    let mut mesh_b = Mesh::new(triangle(&b), Arc::new(Material::new("b", shared.clone())));

    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 1);
    assert_eq!(mesh_b.render(&mut b, None).unwrap().rebind_count, 1);
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 0);

    // Explicit global reset
    invalidate_draw_caches();
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 1);
    assert_eq!(mesh_b.render(&mut b, None).unwrap().rebind_count, 1);
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 0);

    // Local invalidation leaves other contexts alone
    a.draw_state().invalidate();
    assert_eq!(mesh_b.render(&mut b, None).unwrap().rebind_count, 0);
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 1);

    // Material attribute set changed in place
    Mesh::material_changed();
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 1);

    // Swapping to another material sharing the shader still resets
    mesh_a.set_material(Some(Arc::new(Material::new("a2", shared))));
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 1);

    // Re-assigning the same material is not a change
    let same = mesh_a.material().cloned();
    mesh_a.set_material(same);
    assert_eq!(mesh_a.render(&mut a, None).unwrap().rebind_count, 0);
}
