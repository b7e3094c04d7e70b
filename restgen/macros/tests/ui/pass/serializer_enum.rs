use restgen_macros::generate_serializer;

#[generate_serializer]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    #[alias("public")]
    Public,
    #[alias("private")]
    Private,
    Internal,
}

fn main() {
    assert_ne!(Visibility::Public, Visibility::Internal);
    let _ = Visibility::Private;
}
