use std::sync::Arc;

use glam::Mat4;
use parking_lot::Mutex;
use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use uuid::Uuid;

use crate::errors::{RenderError, Result};
use crate::resources::id::NodeId;
use crate::resources::version_tracker::ChangeTracker;

/// Memoized sub-array for one dependent mesh.
#[derive(Debug, Clone)]
struct SubMatrices {
    joints: SmallVec<[usize; 32]>,
    version: u64,
    data: Arc<[f32]>,
}

/// A joint hierarchy shared by any number of skinned meshes.
///
/// Each mesh uses its own subset of the joints, given as indices into the
/// skeleton's joint array. The skeleton answers "which inverse bind matrices
/// does mesh X with joints J need" without storing anything on the mesh, so one
/// instance can serve every mesh that references it.
#[derive(Debug)]
pub struct Skeleton {
    pub id: Uuid,
    pub name: String,

    // Inverse Bind Matrices
    // Static data, typically unchanged after loading
    // Purpose: transforms vertices from mesh space to joint local space
    inverse_bind_matrices: Vec<Mat4>,
    tracker: ChangeTracker,

    // Keyed by the dependent mesh; an entry is reused only while both the
    // joint list and the matrix version match.
    sub_matrices: Mutex<FxHashMap<NodeId, SubMatrices>>,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str, inverse_bind_matrices: Vec<Mat4>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.to_string(),
            inverse_bind_matrices,
            tracker: ChangeTracker::new(),
            sub_matrices: Mutex::new(FxHashMap::default()),
        }
    }

    #[inline]
    #[must_use]
    pub fn joint_count(&self) -> usize {
        self.inverse_bind_matrices.len()
    }

    #[inline]
    #[must_use]
    pub fn inverse_bind_matrices(&self) -> &[Mat4] {
        &self.inverse_bind_matrices
    }

    /// Replaces the inverse bind matrix of joint `index`.
    pub fn set_inverse_bind_matrix(&mut self, index: usize, matrix: Mat4) -> Result<()> {
        let joint_count = self.joint_count();
        let slot = self
            .inverse_bind_matrices
            .get_mut(index)
            .ok_or(RenderError::JointOutOfRange {
                joint: index,
                joint_count,
            })?;
        *slot = matrix;
        self.tracker.changed();
        Ok(())
    }

    /// Flattened (column-major) inverse bind matrices of `joints`, in the
    /// order given, for the mesh identified by `mesh`.
    ///
    /// Results are memoized per mesh, so meshes sharing this skeleton with
    /// different joint subsets never see each other's arrays.
    pub fn sub_inv_bind_matrices(&self, mesh: NodeId, joints: &[usize]) -> Result<Arc<[f32]>> {
        let version = self.tracker.version();
        let mut cache = self.sub_matrices.lock();

        if let Some(entry) = cache.get(&mesh)
            && entry.version == version
            && entry.joints.as_slice() == joints
        {
            return Ok(entry.data.clone());
        }

        let joint_count = self.joint_count();
        let mut data = Vec::with_capacity(joints.len() * 16);
        for &joint in joints {
            let matrix = self
                .inverse_bind_matrices
                .get(joint)
                .ok_or(RenderError::JointOutOfRange { joint, joint_count })?;
            data.extend_from_slice(bytemuck::cast_slice::<Mat4, f32>(std::slice::from_ref(
                matrix,
            )));
        }

        log::debug!(
            "Skeleton '{}': refreshed {} inverse bind matrices for {mesh}",
            self.name,
            joints.len()
        );

        let data: Arc<[f32]> = data.into();
        cache.insert(
            mesh,
            SubMatrices {
                joints: SmallVec::from_slice(joints),
                version,
                data: data.clone(),
            },
        );
        Ok(data)
    }

    /// Drops the memoized sub-array of `mesh`. Returns `false` if there was
    /// none.
    pub fn release(&self, mesh: NodeId) -> bool {
        self.sub_matrices.lock().remove(&mesh).is_some()
    }

    /// Number of meshes with a memoized sub-array.
    #[must_use]
    pub fn tracked_meshes(&self) -> usize {
        self.sub_matrices.lock().len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn skeleton() -> Skeleton {
        Skeleton::new(
            "rig",
            (0..4)
                .map(|i| Mat4::from_translation(Vec3::splat(i as f32)))
                .collect(),
        )
    }

    #[test]
    fn subset_follows_joint_order() {
        let skeleton = skeleton();
        let mesh = NodeId::next();

        let data = skeleton.sub_inv_bind_matrices(mesh, &[3, 1]).unwrap();
        assert_eq!(data.len(), 32);
        // Translation lives in the fourth column.
        assert_eq!(&data[12..15], &[3.0, 3.0, 3.0]);
        assert_eq!(&data[28..31], &[1.0, 1.0, 1.0]);
    }

    #[test]
    fn memo_is_reused_until_matrices_change() {
        let mut skeleton = skeleton();
        let mesh = NodeId::next();

        let first = skeleton.sub_inv_bind_matrices(mesh, &[0, 1]).unwrap();
        let second = skeleton.sub_inv_bind_matrices(mesh, &[0, 1]).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        skeleton
            .set_inverse_bind_matrix(0, Mat4::from_translation(Vec3::splat(9.0)))
            .unwrap();
        let third = skeleton.sub_inv_bind_matrices(mesh, &[0, 1]).unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(&third[12..15], &[9.0, 9.0, 9.0]);
    }

    #[test]
    fn out_of_range_joint_is_reported() {
        let skeleton = skeleton();
        let err = skeleton
            .sub_inv_bind_matrices(NodeId::next(), &[0, 7])
            .unwrap_err();
        assert_eq!(
            err,
            RenderError::JointOutOfRange {
                joint: 7,
                joint_count: 4
            }
        );
    }

    #[test]
    fn release_forgets_the_mesh() {
        let skeleton = skeleton();
        let (a, b) = (NodeId::next(), NodeId::next());
        skeleton.sub_inv_bind_matrices(a, &[0]).unwrap();
        skeleton.sub_inv_bind_matrices(b, &[1]).unwrap();
        assert_eq!(skeleton.tracked_meshes(), 2);

        assert!(skeleton.release(a));
        assert!(!skeleton.release(a));
        assert_eq!(skeleton.tracked_meshes(), 1);
    }
}
