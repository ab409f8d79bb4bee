//! Storage of keys, credentials and traces as SQLite blobs.

/// Implement `sqlx::Type`, `sqlx::Encode` and `sqlx::Decode` for a serde type, storing it as a
/// blob in its [`encoding`](crate::encoding) record form.
#[macro_export]
macro_rules! impl_sqlx_for_bincode_ty {
    ($type:ty) => {
        impl ::sqlx::Type<::sqlx::Sqlite> for $type {
            fn type_info() -> ::sqlx::sqlite::SqliteTypeInfo {
                <::std::vec::Vec<::std::primitive::u8> as ::sqlx::Type<::sqlx::Sqlite>>::type_info()
            }
        }

        impl ::sqlx::Encode<'_, ::sqlx::Sqlite> for $type {
            fn encode_by_ref(
                &self,
                buf: &mut <::sqlx::Sqlite as ::sqlx::database::HasArguments<'_>>::ArgumentBuffer,
            ) -> ::sqlx::encode::IsNull {
                // records hold only fixed-width elements, strings and vectors
                let bytes = $crate::encoding::encode(self).expect(::std::concat!(
                    "could not encode ",
                    ::std::stringify!($type)
                ));
                <::std::vec::Vec<::std::primitive::u8> as ::sqlx::Encode<'_, ::sqlx::Sqlite>>::encode(
                    bytes, buf,
                )
            }
        }

        impl ::sqlx::Decode<'_, ::sqlx::Sqlite> for $type {
            fn decode(
                value: ::sqlx::sqlite::SqliteValueRef<'_>,
            ) -> ::std::result::Result<Self, ::sqlx::error::BoxDynError> {
                if ::sqlx::ValueRef::is_null(&value) {
                    return ::std::result::Result::Err(::std::boxed::Box::new(
                        ::sqlx::error::UnexpectedNullError,
                    ));
                }
                let blob =
                    <&[::std::primitive::u8] as ::sqlx::Decode<::sqlx::Sqlite>>::decode(value)?;
                let decoded = $crate::encoding::decode(blob)?;
                ::std::result::Result::Ok(decoded)
            }
        }
    };
}
