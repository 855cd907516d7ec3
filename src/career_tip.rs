use chrono::{Datelike, NaiveDate};

use crate::{
    error::StorageError,
    models::CareerTip,
    storage::{BrowserStorage, keys},
};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// TipOfTheDay
///
/// `first_view_today` is true only the first time the tip is asked for on a
/// given date; that is when the home page pops it up.
#[derive(Debug, Clone, PartialEq)]
pub struct TipOfTheDay {
    pub tip: CareerTip,
    pub first_view_today: bool,
}

/// tip_of_the_day
///
/// Reads the cached tip when it was stored for `today`, otherwise picks one by
/// day of year and caches it under `careerTipDate` / `careerTip`.
pub fn tip_of_the_day(
    storage: &dyn BrowserStorage,
    tips: &[CareerTip],
    today: NaiveDate,
) -> Result<Option<TipOfTheDay>, StorageError> {
    let today_key = today.format(DATE_FORMAT).to_string();

    if storage.get(keys::CAREER_TIP_DATE).as_deref() == Some(today_key.as_str())
        && let Some(tip) = storage
            .get(keys::CAREER_TIP)
            .and_then(|raw| serde_json::from_str::<CareerTip>(&raw).ok())
    {
        return Ok(Some(TipOfTheDay {
            tip,
            first_view_today: false,
        }));
    }

    if tips.is_empty() {
        return Ok(None);
    }

    let tip = tips[today.ordinal0() as usize % tips.len()].clone();
    storage.set(keys::CAREER_TIP, &serde_json::to_string(&tip)?)?;
    storage.set(keys::CAREER_TIP_DATE, &today_key)?;
    tracing::debug!(tip_id = tip.id, date = %today_key, "career tip cached");

    Ok(Some(TipOfTheDay {
        tip,
        first_view_today: true,
    }))
}
