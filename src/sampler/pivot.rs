use utils::uuid::UUID;

/// Source of the random point a range sample starts scanning from
pub trait PivotSource: Send + Sync + 'static {
    fn next_pivot(&self) -> UUID;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct RandomPivots;

impl PivotSource for RandomPivots {
    fn next_pivot(&self) -> UUID {
        UUID::rand()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct FixedPivot(pub UUID);

impl PivotSource for FixedPivot {
    fn next_pivot(&self) -> UUID {
        self.0
    }
}
