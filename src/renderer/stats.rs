/// Statistics of one mesh render call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderInfo {
    pub face_count: u32,
    pub vertex_count: u32,
    pub draw_call_count: u32,
    /// Chunks whose attribute bindings had to be reconfigured.
    pub rebind_count: u32,
}

impl RenderInfo {
    /// Adds `other` into `self`, for per-frame totals.
    pub fn accumulate(&mut self, other: &RenderInfo) {
        self.face_count += other.face_count;
        self.vertex_count += other.vertex_count;
        self.draw_call_count += other.draw_call_count;
        self.rebind_count += other.rebind_count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accumulate_sums_fields() {
        let mut total = RenderInfo::default();
        total.accumulate(&RenderInfo {
            face_count: 2,
            vertex_count: 4,
            draw_call_count: 1,
            rebind_count: 1,
        });
        total.accumulate(&RenderInfo {
            face_count: 12,
            vertex_count: 24,
            draw_call_count: 2,
            rebind_count: 0,
        });
        assert_eq!(
            total,
            RenderInfo {
                face_count: 14,
                vertex_count: 28,
                draw_call_count: 3,
                rebind_count: 1,
            }
        );
    }
}
