//! Tests for configuration

#[cfg(test)]
mod tests {
    use super::super::config::*;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn minimal_config() -> Config {
        let toml_str = r#"
[sheets]
spreadsheet_id = "sheet123"
api_key = "key123"

[odds]
api_key = "odds123"
"#;
        toml::from_str(toml_str).unwrap()
    }

    #[test]
    fn test_engine_config_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.weights.woba, dec!(0.30));
        assert_eq!(config.weights.xwoba, dec!(0.30));
        assert_eq!(config.weights.xslg, dec!(0.25));
        assert_eq!(config.weights.xba, dec!(0.15));
        assert_eq!(config.weights.sum(), Decimal::ONE);
        assert_eq!(config.adjustment_factor, dec!(0.5));
        assert_eq!(config.market_blend, dec!(0.5));
        assert_eq!(config.logistic_scale, dec!(10));
        assert_eq!(config.high_confidence, dec!(0.10));
        assert_eq!(config.medium_confidence, dec!(0.04));
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_engine_config_empty_toml_matches_defaults() {
        let config: EngineConfig = toml::from_str("").unwrap();
        assert_eq!(config.weights.sum(), Decimal::ONE);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_engine_config_deserialize() {
        let toml_str = r#"
adjustment_factor = 0.4
market_blend = 0.6
logistic_scale = 8
high_confidence = 0.12
medium_confidence = 0.05
top_n = 3

[weights]
woba = 0.35
xwoba = 0.25
xslg = 0.25
xba = 0.15
"#;
        let config: EngineConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.weights.woba, dec!(0.35));
        assert_eq!(config.adjustment_factor, dec!(0.4));
        assert_eq!(config.market_blend, dec!(0.6));
        assert_eq!(config.top_n, 3);
    }

    #[test]
    fn test_sheets_config_defaults() {
        let toml_str = r#"
spreadsheet_id = "sheet123"
api_key = "key123"
"#;
        let config: SheetsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.spreadsheet_id, "sheet123");
        assert_eq!(config.stats_range, "Batting Stats!A1:Z40");
        assert_eq!(config.cache_minutes, 15);
    }

    #[test]
    fn test_odds_config_defaults() {
        let toml_str = r#"
api_key = "odds123"
"#;
        let config: OddsConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.base_url, "https://api.the-odds-api.com/v4");
        assert_eq!(config.sport, "baseball_mlb");
        assert_eq!(config.regions, "us");
    }

    #[test]
    fn test_telegram_config_defaults() {
        let toml_str = r#"
bot_token = "123:abc"
chat_id = "12345"
"#;
        let config: TelegramConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.bot_token, "123:abc");
        assert!(config.notify_picks);
        assert!(config.notify_errors);
    }

    #[test]
    fn test_telegram_config_disabled_notifications() {
        let toml_str = r#"
bot_token = "123:abc"
chat_id = "12345"
notify_picks = false
"#;
        let config: TelegramConfig = toml::from_str(toml_str).unwrap();
        assert!(!config.notify_picks);
        assert!(config.notify_errors); // defaults to true
    }

    #[test]
    fn test_bot_config_default_interval() {
        let config: BotConfig = toml::from_str("").unwrap();
        assert_eq!(config.scan_interval_secs, 900);
    }

    #[test]
    fn test_minimal_config_validates() {
        let config = minimal_config();
        assert!(config.validate().is_ok());
        assert!(config.telegram.is_none());
    }

    #[test]
    fn test_validate_rejects_bad_weight_sum() {
        let mut config = minimal_config();
        config.engine.weights.woba = dec!(0.50);
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("sum to 1.0"));
    }

    #[test]
    fn test_validate_rejects_out_of_range_blend() {
        let mut config = minimal_config();
        config.engine.market_blend = dec!(1.5);
        assert!(config.validate().is_err());
        config.engine.market_blend = dec!(-0.1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_unordered_thresholds() {
        let mut config = minimal_config();
        config.engine.high_confidence = dec!(0.02);
        config.engine.medium_confidence = dec!(0.05);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_top_n() {
        let mut config = minimal_config();
        config.engine.top_n = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_cache_window() {
        let mut config = minimal_config();
        config.sheets.cache_minutes = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(
            file,
            r#"
[sheets]
spreadsheet_id = "sheet123"
api_key = "key123"

[odds]
api_key = "odds123"

[engine]
top_n = 3

[telegram]
bot_token = "123:abc"
chat_id = "42"
"#
        )
        .unwrap();

        let config = Config::load(file.path().to_str().unwrap()).unwrap();
        assert_eq!(config.engine.top_n, 3);
        assert_eq!(config.telegram.unwrap().chat_id, "42");
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        use std::io::Write;

        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        // Weight sum is off, load must fail validation
        writeln!(
            file,
            r#"
[sheets]
spreadsheet_id = "sheet123"
api_key = "key123"

[odds]
api_key = "odds123"

[engine.weights]
woba = 0.9
"#
        )
        .unwrap();

        assert!(Config::load(file.path().to_str().unwrap()).is_err());
    }
}
