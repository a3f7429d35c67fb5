//! Macros for declaring state enums.

/// Declare a closed state enum and its `State` implementation.
///
/// Each variant is paired with its state name, which is also its serialized
/// form. The generated enum gets `ALL` and `from_name`.
///
/// # Example
///
/// ```
/// use coinop::core::State;
/// use coinop::state_enum;
///
/// state_enum! {
///     pub enum Door {
///         Closed => "closed",
///         Opening => "opening",
///         Open => "open",
///     }
///     transient: [Opening]
/// }
///
/// assert_eq!(Door::Open.name(), "open");
/// assert_eq!(Door::from_name("opening"), Some(Door::Opening));
/// assert!(Door::Opening.is_transient());
/// assert_eq!(Door::ALL.len(), 3);
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $label:literal
            ),* $(,)?
        }

        $(transient: [$($transient:ident),* $(,)?])?
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                #[serde(rename = $label)]
                $variant
            ),*
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),*];

            /// Look a variant up by its state name.
            pub fn from_name(name: &str) -> Option<Self> {
                match name {
                    $($label => Some(Self::$variant),)*
                    _ => None,
                }
            }
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => $label),*
                }
            }

            fn is_transient(&self) -> bool {
                match self {
                    $($(Self::$transient => true,)*)?
                    #[allow(unreachable_patterns)]
                    _ => false,
                }
            }
        }
    };
}
