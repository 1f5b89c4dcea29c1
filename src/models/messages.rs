//! 对外返回的用户可见文案（站点面向西班牙语用户）

pub const CREDENTIALS_REQUIRED: &str = "Usuario y contraseña requeridos";
pub const USER_EXISTS: &str = "El usuario ya existe";
pub const INVALID_CREDENTIALS: &str = "Usuario o contraseña incorrectos";
pub const LOGIN_SUCCESS: &str = "Login exitoso";
pub const REGISTER_SUCCESS: &str = "Usuario registrado con éxito";
pub const TOKEN_REQUIRED: &str = "No autorizado - Token requerido";
pub const TOKEN_INVALID: &str = "Token inválido o expirado";
pub const QUOTATION_FIELDS_REQUIRED: &str = "Nombre, apellido y email son requeridos";
pub const CONTACT_FIELDS_REQUIRED: &str = "Nombre, apellido, email y mensaje son requeridos";
pub const CONTACT_SUCCESS: &str = "Mensaje guardado correctamente";
pub const CONTACT_SAVED_LOCALLY: &str = "Mensaje guardado localmente (almacenamiento principal no disponible)";
pub const SYNC_PENDING: &str = "Sincronización con el almacenamiento principal pendiente";
pub const PRIMARY_UNAVAILABLE: &str = "Almacenamiento principal no disponible, mostrando solo datos locales";
pub const INVALID_BODY: &str = "Cuerpo de la solicitud inválido";
pub const BODY_TOO_LARGE: &str = "Cuerpo de la solicitud demasiado grande";
pub const SERVER_ERROR: &str = "Error interno del servidor";
