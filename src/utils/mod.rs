pub mod api_response;
pub mod htmx;
pub mod jwt_utils;
pub mod pagination;
pub mod validated_wrapper;
pub mod validator_utils;
