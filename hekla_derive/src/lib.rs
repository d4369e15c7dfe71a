//! Derive macros for the Hekla ECS.
//!
//! This crate provides procedural macros to reduce boilerplate when implementing
//! ECS traits.

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for the Component trait.
///
/// Components opt into the ECS explicitly; there is no blanket implementation.
/// This macro emits the marker impl so plain data structs can be attached to
/// entities without hand-written trait plumbing.
///
/// # Requirements
///
/// The `Component` trait must be in scope when using this derive macro.
/// Import it with `use hekla_ecs::Component;` or have it available in your
/// module.
///
/// # Example
///
/// ```ignore
/// use hekla_ecs::Component;
///
/// #[derive(Component)]
/// struct HealthComponent {
///     current: f32,
///     max: f32,
/// }
/// ```
///
/// This will expand to:
///
/// ```ignore
/// impl Component for HealthComponent {}
/// ```
#[proc_macro_derive(Component)]
pub fn derive_component(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    // Use unqualified Component which will be resolved from scope.
    // This allows it to work both inside the hekla crates and in user code.
    let expanded = quote! {
        impl Component for #name {}
    };

    TokenStream::from(expanded)
}
