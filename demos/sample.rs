use snake_charm::{build, ConfigEntry, Error, StoreError};

fn schema() -> Vec<ConfigEntry> {
    vec![
        ConfigEntry::int("port", 80)
            .help("Port on which to listen for requests")
            .required(),
        ConfigEntry::parent(
            "slack",
            vec![ConfigEntry::string("token", "")
                .help("Token to use when dealing with slack")
                .required()],
        ),
        ConfigEntry::parent(
            "db",
            vec![
                ConfigEntry::int("port", 3306)
                    .help("Port on which to connect to the db")
                    .required(),
                ConfigEntry::string("host", "localhost")
                    .help("Hostname to connect to in the db")
                    .required(),
                ConfigEntry::string("username", "")
                    .help("Username to use when connecting to the DB")
                    .required(),
                ConfigEntry::string("password", "")
                    .help("Password to use when connecting to the DB")
                    .required(),
                ConfigEntry::string("name", "")
                    .help("Name of database to use")
                    .required(),
            ],
        ),
    ]
}

fn main() -> Result<(), Error> {
    pretty_env_logger::init();

    let cfg = match build(None, &mut schema()) {
        Ok(cfg) => cfg,
        Err(Error::Store(StoreError::Flags(e))) => e.exit(),
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    println!("port: {}", cfg.get_int("port")?);
    println!("db.port: {}", cfg.get_int("db.port")?);
    println!("db.host: {}", cfg.get_string("db.host")?);
    println!("db.username: {}", cfg.get_string("db.username")?);
    println!("db.password: {}", cfg.get_string("db.password")?);
    println!("db.name: {}", cfg.get_string("db.name")?);
    println!("slack.token: {}", cfg.get_string("slack.token")?);

    Ok(())
}
