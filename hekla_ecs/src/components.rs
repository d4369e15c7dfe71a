// Re-export the derive macro for convenience
pub use hekla_derive::Component;

/// Core Component trait for the ECS.
///
/// Components are plain data values attached to entities. Each component kind
/// gets its own pool with contiguous storage, so keep components small and
/// data-only. Kinds opt in explicitly; there is no blanket implementation.
///
/// # Examples
///
/// ```
/// use hekla_ecs::Component;
///
/// #[derive(Component)]
/// struct HealthComponent {
///     current: f32,
///     max: f32,
/// }
/// ```
pub trait Component: 'static {}
