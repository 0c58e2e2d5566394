use envconfig::Envconfig;

#[derive(Envconfig, Debug, Clone)]
pub struct Env {
    #[envconfig(from = "HOST", default = "127.0.0.1")]
    pub host: String,

    #[envconfig(from = "PORT", default = "8000")]
    pub port: u16,

    #[envconfig(from = "DATABASE_URL", default = "payments.sqlite3")]
    pub database_url: String,

    #[envconfig(from = "DB_POOL_SIZE", default = "8")]
    pub db_pool_size: u32,

    // Where uploaded receipts land on disk
    #[envconfig(from = "MEDIA_ROOT", default = "media")]
    pub media_root: String,

    #[envconfig(from = "MEDIA_URL", default = "/media/")]
    pub media_url: String,

    #[envconfig(from = "ADMIN_USER", default = "admin")]
    pub admin_user: String,

    #[envconfig(from = "ADMIN_PASSWORD")]
    pub admin_password: String,
}

impl Env {
    pub fn env_init() -> Result<Env, envconfig::Error> {
        Env::init_from_env()
    }
}
