/// Declares a closed set of named columns: the enum itself, its ordered
/// `ALL` list and the label written into table headers.
macro_rules! define_columns {
    ($(#[$meta:meta])* $vis:vis enum $ty:ident { $($name:ident => $label:literal,)* }) => {
        $(#[$meta])*
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        $vis enum $ty {
            $(
                $name,
            )*
        }

        impl $ty {
            pub const ALL: &'static [$ty] = &[
                $(
                    $ty::$name,
                )*
            ];

            pub fn label(&self) -> &'static str {
                match self {
                    $(
                        $ty::$name => $label,
                    )*
                }
            }

            pub fn index(&self) -> usize {
                *self as usize
            }
        }

        impl std::fmt::Display for $ty {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.label())
            }
        }
    };
}
