use uuid::Uuid;

macro_rules! id_newtypes {
    { $( $Ident:ident, )* } => {$(
        #[derive(
            Debug, serde::Deserialize, serde::Serialize,
            Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
        )]
        #[serde(transparent)]
        pub struct $Ident(pub Uuid);

        impl $Ident {
            #[must_use]
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }
        }

        impl From<Uuid> for $Ident {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $Ident {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }
    )*};
}

id_newtypes! {
    UserId,
    PostId,
    ReplyId,
}
