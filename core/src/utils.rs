/// Declares `default_<name>()` functions for `#[serde(default = "...")]` attributes.
#[macro_export]
macro_rules! default {
    ($name: ident: $ty: ty = $value: expr) => {
        $crate::paste!{
            #[allow(dead_code)]
            pub(crate) fn [<default_ $name:snake>]() -> $ty {
                $value
            }
        }
    };
    ( $($ty: ty: { $($name: ident = $value: expr), + $(,)?}), + $(,)?) => {
        $($(
            $crate::default!{
                $name: $ty = $value
            }
        )*)*
    };
}
