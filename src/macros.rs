/// Builds an [`Element`](crate::Element) tree from a literal description.
///
/// Child elements are written as `"Name" { ... }`, attributes as
/// `"Name" => [values]`. Values are literals converted with `ToString`;
/// `null` stands for a null value.
///
/// # Examples
///
/// ```rust
/// use sml::sml;
///
/// let root = sml!("Root" {
///     "Attr" => ["1", null],
///     "Port" => [8080],
///     "Sub" { },
/// });
/// assert_eq!(root.to_minified_string().unwrap(), "Root\nAttr 1 -\nPort 8080\nSub\n-\n-");
/// ```
#[macro_export]
macro_rules! sml {
    (@value null) => {
        ::std::option::Option::None::<::std::string::String>
    };

    (@value $value:tt) => {
        ::std::option::Option::Some(::std::string::ToString::to_string(&$value))
    };

    (@nodes $parent:ident;) => {};

    // Attribute
    (@nodes $parent:ident; $name:literal => [ $($value:tt),+ $(,)? ] $(, $($rest:tt)*)?) => {
        let mut values = ::std::vec![$($crate::sml!(@value $value)),+].into_iter();
        let first = values.next().flatten();
        $parent.add_node($crate::Attribute::from_first($name, first, values));
        $($crate::sml!(@nodes $parent; $($rest)*);)?
    };

    // Element
    (@nodes $parent:ident; $name:literal { $($body:tt)* } $(, $($rest:tt)*)?) => {
        $parent.add_node($crate::sml!($name { $($body)* }));
        $($crate::sml!(@nodes $parent; $($rest)*);)?
    };

    ($name:literal { $($body:tt)* }) => {{
        #[allow(unused_mut)]
        let mut element = $crate::Element::new($name);
        $crate::sml!(@nodes element; $($body)*);
        element
    }};
}
