/// Declare a configurable struct.
///
/// The struct is emitted unchanged (attributes and doc comments included)
/// together with its [`Configurable`](crate::field::Configurable) and
/// [`Field`](crate::field::Field) implementations. Tags follow the field
/// type after `=>`:
///
/// ```
/// fieldwise::configurable! {
///     #[derive(Debug, Default)]
///     pub struct Server {
///         pub host: String => [env = "HOST", default = "localhost"],
///         pub port: u16 => [flag = "port|8080|listen port"],
///         pub tls: Option<Box<Tls>>,
///     }
/// }
///
/// fieldwise::configurable! {
///     #[derive(Debug, Default)]
///     pub struct Tls {
///         pub cert: std::path::PathBuf => [file_json = "tls.cert"],
///     }
/// }
/// ```
#[macro_export]
macro_rules! configurable {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty $(=> [$($key:ident = $value:literal),* $(,)?])?
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        $vis struct $name {
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::field::Configurable for $name {
            fn struct_name(&self) -> &'static str {
                ::core::stringify!($name)
            }

            #[allow(unused_variables)]
            fn visit_fields(
                &mut self,
                visitor: &mut dyn $crate::field::FieldVisitor,
            ) -> ::core::ops::ControlFlow<()> {
                $({
                    static META: $crate::field::FieldMeta = $crate::field::FieldMeta {
                        name: ::core::stringify!($field),
                        type_name: ::core::stringify!($ty),
                        tags: $crate::field::Tags::new(&[$($((::core::stringify!($key), $value)),*)?]),
                    };
                    let field = $crate::field::Field::as_field_mut(&mut self.$field);
                    if visitor.visit(&META, field).is_break() {
                        return ::core::ops::ControlFlow::Break(());
                    }
                })*
                ::core::ops::ControlFlow::Continue(())
            }
        }

        impl $crate::field::Field for $name {
            fn as_field_mut(&mut self) -> $crate::field::FieldMut<'_> {
                $crate::field::FieldMut::Struct(self)
            }
        }
    };
}
