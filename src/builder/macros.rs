//! Macros for ergonomic state machine construction.

/// Declare a fieldless state enum and implement [`State`](crate::core::State)
/// for it.
///
/// The generated `variants()` lists the variants in declaration order, which
/// is what `in_all_states` and `in_all_states_except` enumerate.
///
/// # Example
///
/// ```
/// use switchyard::core::State;
/// use switchyard::state_enum;
///
/// state_enum! {
///     pub enum FeedState {
///         Normal,
///         Exception,
///         HalfOpen,
///     }
/// }
///
/// assert_eq!(FeedState::HalfOpen.name(), "HalfOpen");
/// assert_eq!(FeedState::variants().len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Debug,
            serde::Serialize,
            serde::Deserialize
        )]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }

            fn variants() -> ::std::vec::Vec<Self> {
                ::std::vec![$(Self::$variant),*]
            }
        }
    };
}
