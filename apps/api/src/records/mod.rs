// CRUD handlers shared by resumes and cover letters.
// Each handler is generic over the record kind and is registered once per
// kind in `routes::build_router`, e.g. `get(handle_get::<Resume>)`.

pub mod handlers;
