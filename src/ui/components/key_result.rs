/// What a component did with a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyResult<T> {
  /// Consumed, nothing for the caller to do
  Handled,
  /// Consumed and produced an event for the caller
  Event(T),
  /// Not for this component
  NotHandled,
}
