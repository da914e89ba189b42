use thiserror::Error;

use crate::config::{GalaxyParams, ParamError};
use crate::galaxy::{ParticleBuffer, scatter_seeded};

/// Renderable wrapper around one generated buffer.
#[derive(Debug)]
pub struct PointCloud {
    pub particles: ParticleBuffer,
    pub point_size: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId(u64);

/// Host-side display list. Insertion order is irrelevant for point clouds;
/// `remove` hands the cloud back so it is released in the caller's scope.
#[derive(Default)]
pub struct Scene {
    next_id: u64,
    objects: Vec<(ObjectId, PointCloud)>,
}

#[derive(Debug, Error, PartialEq)]
pub enum SceneError {
    #[error("object {0:?} is not in the scene")]
    Missing(ObjectId),
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, cloud: PointCloud) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.push((id, cloud));
        id
    }

    pub fn remove(&mut self, id: ObjectId) -> Result<PointCloud, SceneError> {
        let idx = self
            .objects
            .iter()
            .position(|(oid, _)| *oid == id)
            .ok_or(SceneError::Missing(id))?;
        Ok(self.objects.swap_remove(idx).1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&PointCloud> {
        self.objects
            .iter()
            .find(|(oid, _)| *oid == id)
            .map(|(_, cloud)| cloud)
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }
}

#[derive(Debug, Error)]
pub enum GenerateError {
    #[error(transparent)]
    InvalidParams(#[from] ParamError),
    #[error("failed to dispose previous point cloud: {0}")]
    Scene(#[from] SceneError),
}

/// Owns the currently displayed point cloud, at most one at a time.
///
/// `regenerate` removes and drops the previous cloud before computing the
/// next, so the scene never holds two generations at once. The generator does
/// both sides of the swap; hosts only read the scene.
#[derive(Default)]
pub struct GalaxyGenerator {
    installed: Option<ObjectId>,
}

impl GalaxyGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn installed(&self) -> Option<ObjectId> {
        self.installed
    }

    /// Validate, dispose the prior cloud, scatter, install.
    ///
    /// On a validation error nothing is touched and the prior cloud stays
    /// displayed. A failed removal propagates rather than installing over an
    /// un-removed object.
    pub fn regenerate(
        &mut self,
        scene: &mut Scene,
        seed: u64,
        params: &GalaxyParams,
    ) -> Result<ObjectId, GenerateError> {
        params.validate()?;

        if let Some(prior) = self.installed.take() {
            scene.remove(prior)?;
            log::debug!("disposed point cloud {prior:?}");
        }

        let particles = scatter_seeded(seed, params);
        let id = scene.add(PointCloud {
            particles,
            point_size: params.particle_size,
        });
        self.installed = Some(id);
        Ok(id)
    }
}
