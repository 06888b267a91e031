//! HTTP request handlers for the record resource interactions.
//!
//! One module per interaction, following the collection/record split:
//!
//! | Interaction | HTTP Method | URL Pattern |
//! |-------------|-------------|-------------|
//! | create | POST | `/{collection}` |
//! | list | GET | `/{collection}` |
//! | delete all | DELETE | `/{collection}` |
//! | read | GET | `/{collection}/{id}` |
//! | replace | PUT | `/{collection}/{id}` |
//! | modify | PATCH | `/{collection}/{id}` |
//! | delete | DELETE | `/{collection}/{id}` |
//! | heartbeat | GET | `/__heartbeat__` |

pub mod create;
pub mod delete;
pub mod health;
pub mod list;
pub mod patch;
pub mod read;
pub mod replace;

pub use create::create_handler;
pub use delete::{delete_collection_handler, delete_record_handler};
pub use health::heartbeat_handler;
pub use list::list_handler;
pub use patch::patch_handler;
pub use read::read_handler;
pub use replace::replace_handler;

use serde_json::Value;

/// Removes the server-assigned fields from a client payload.
///
/// Client-supplied `id` and `last_modified` values never reach storage;
/// the backend assigns both on every write.
pub(crate) fn strip_server_fields(data: &mut Value) {
    if let Some(object) = data.as_object_mut() {
        object.remove("id");
        object.remove("last_modified");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn server_fields_are_stripped() {
        let mut data = json!({"id": 3.14, "last_modified": "abc", "name": "x"});
        strip_server_fields(&mut data);
        assert_eq!(data, json!({"name": "x"}));
    }
}
