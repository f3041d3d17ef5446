/// Execution strategy markers. They let the compiler pick an executor
/// implementation for an operator without the user naming it.
pub(crate) mod strategy {
  /// Operator handles the whole population itself.
  pub enum CustomExecutionStrategy {}

  /// Operator is applied to each individual in turn.
  pub enum SequentialExecutionStrategy {}

  /// Operator is applied to each individual in parallel.
  pub enum ParallelEachExecutionStrategy {}

  /// Operator is applied to equal batches of individuals in parallel.
  pub enum ParallelBatchExecutionStrategy {}
}
