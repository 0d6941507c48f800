//! Pure classification of raw access point properties.
//!
//! Everything here is total and side-effect free: flag masks become a
//! [`SecurityType`], a frequency becomes a channel number, and an RSSI
//! becomes a [`SignalRating`].

use bitflags::bitflags;

use crate::api::models::{AccessPoint, SecurityType, SignalRating};
use crate::bus::RawAccessPoint;
use crate::types::constants::security_flags;

bitflags! {
    /// `NM80211ApSecurityFlags`, as carried by both `WpaFlags` and `RsnFlags`.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ApSecurityFlags: u32 {
        const PAIR_WEP40 = security_flags::PAIR_WEP40;
        const PAIR_WEP104 = security_flags::PAIR_WEP104;
        const PAIR_TKIP = security_flags::PAIR_TKIP;
        const PAIR_CCMP = security_flags::PAIR_CCMP;
        const GROUP_WEP40 = security_flags::GROUP_WEP40;
        const GROUP_WEP104 = security_flags::GROUP_WEP104;
        const GROUP_TKIP = security_flags::GROUP_TKIP;
        const GROUP_CCMP = security_flags::GROUP_CCMP;
        const KEY_MGMT_PSK = security_flags::KEY_MGMT_PSK;
        const KEY_MGMT_802_1X = security_flags::KEY_MGMT_802_1X;

        const WEP = Self::PAIR_WEP40.bits()
            | Self::PAIR_WEP104.bits()
            | Self::GROUP_WEP40.bits()
            | Self::GROUP_WEP104.bits();
        const CCMP = Self::PAIR_CCMP.bits() | Self::GROUP_CCMP.bits();
    }
}

/// Maps WPA and RSN flag masks to a security type.
///
/// Stronger schemes are tested first. The WPA mask is only consulted for key
/// management once the RSN mask has nothing to say.
pub fn classify_security(wpa_flags: u32, rsn_flags: u32) -> SecurityType {
    let wpa = ApSecurityFlags::from_bits_retain(wpa_flags);
    let rsn = ApSecurityFlags::from_bits_retain(rsn_flags);

    if wpa.is_empty() && rsn.is_empty() {
        return SecurityType::Open;
    }

    // RSN may list a legacy WEP group cipher (TSN); only WPA marks WEP.
    if wpa.intersects(ApSecurityFlags::WEP) {
        return SecurityType::Wep;
    }

    let rsn_ccmp = rsn.intersects(ApSecurityFlags::CCMP);

    if rsn.contains(ApSecurityFlags::KEY_MGMT_802_1X) && rsn_ccmp {
        SecurityType::Wpa3Enterprise
    } else if rsn.contains(ApSecurityFlags::KEY_MGMT_PSK) && rsn_ccmp {
        SecurityType::Wpa3Personal
    } else if rsn.contains(ApSecurityFlags::KEY_MGMT_802_1X) {
        SecurityType::Wpa2Enterprise
    } else if rsn.contains(ApSecurityFlags::KEY_MGMT_PSK) {
        SecurityType::Wpa2Personal
    } else if wpa.contains(ApSecurityFlags::KEY_MGMT_802_1X) {
        SecurityType::WpaEnterprise
    } else if wpa.contains(ApSecurityFlags::KEY_MGMT_PSK) {
        SecurityType::WpaPersonal
    } else {
        SecurityType::Unknown
    }
}

/// `(low, high, channel)`; each range is half-open and spans the channel's
/// occupied bandwidth.
const CHANNEL_RANGES: &[(u32, u32, u32)] = &[
    // 2.4 GHz, 22 MHz wide and overlapping
    (2401, 2423, 1),
    (2406, 2428, 2),
    (2411, 2433, 3),
    (2416, 2438, 4),
    (2421, 2443, 5),
    (2426, 2448, 6),
    (2431, 2453, 7),
    (2436, 2458, 8),
    (2441, 2463, 9),
    (2446, 2468, 10),
    (2451, 2473, 11),
    (2456, 2478, 12),
    (2461, 2483, 13),
    (2473, 2495, 14),
    // 5 GHz
    (5150, 5170, 32),
    (5170, 5190, 36),
    (5190, 5210, 40),
    (5210, 5230, 44),
    (5230, 5250, 48),
    (5250, 5270, 52),
    (5270, 5290, 56),
    (5290, 5310, 60),
    (5310, 5330, 64),
    (5330, 5350, 68),
    (5350, 5370, 72),
    (5370, 5390, 76),
    (5390, 5410, 80),
    (5410, 5430, 84),
    (5430, 5450, 88),
    (5450, 5470, 92),
    (5470, 5490, 96),
    (5490, 5510, 100),
    (5510, 5530, 104),
    (5530, 5550, 108),
    (5550, 5570, 112),
    (5570, 5590, 116),
    (5590, 5610, 120),
    (5610, 5630, 124),
    (5630, 5650, 128),
    (5650, 5670, 132),
    (5670, 5690, 136),
    (5690, 5710, 140),
    (5710, 5730, 144),
    (5735, 5755, 149),
    (5755, 5775, 153),
    (5775, 5795, 157),
    (5795, 5815, 161),
    (5815, 5835, 165),
    (5835, 5855, 169),
    (5855, 5875, 173),
    (5875, 5895, 177),
    // 6 GHz
    (5925, 5945, 2),
    (5945, 5965, 1),
    (5965, 5985, 5),
    (5985, 6005, 9),
    (6005, 6025, 13),
    (6025, 6045, 17),
    (6045, 6065, 21),
    (6065, 6085, 25),
    (6085, 6105, 29),
    (6105, 6125, 33),
    (6125, 6145, 37),
    (6145, 6165, 41),
    (6165, 6185, 45),
    (6185, 6205, 49),
    (6205, 6225, 53),
    (6225, 6245, 57),
    (6245, 6265, 61),
    (6265, 6285, 65),
    (6285, 6305, 69),
    (6305, 6325, 73),
    (6325, 6345, 77),
    (6345, 6365, 81),
    (6365, 6385, 85),
    (6385, 6405, 89),
    (6405, 6425, 93),
    (6425, 6445, 97),
    (6445, 6465, 101),
    (6465, 6485, 105),
    (6485, 6505, 109),
    (6505, 6525, 113),
    (6525, 6545, 117),
    (6545, 6565, 121),
    (6565, 6585, 125),
    (6585, 6605, 129),
    (6605, 6625, 133),
    (6625, 6645, 137),
    (6645, 6665, 141),
    (6665, 6685, 145),
    (6685, 6705, 149),
    (6705, 6725, 153),
    (6725, 6745, 157),
    (6745, 6765, 161),
    (6765, 6785, 165),
    (6785, 6805, 169),
    (6805, 6825, 173),
    (6825, 6845, 177),
    (6845, 6865, 181),
    (6865, 6885, 185),
    (6885, 6905, 189),
    (6905, 6925, 193),
    (6925, 6945, 197),
    (6945, 6965, 201),
    (6965, 6985, 205),
    (6985, 7005, 209),
    (7005, 7025, 213),
    (7025, 7045, 217),
    (7045, 7065, 221),
    (7065, 7085, 225),
    (7085, 7105, 229),
    (7105, 7125, 233),
];

/// Returns the channel for a frequency in MHz, or `0` if it is in no band.
///
/// 2.4 GHz ranges overlap; the channel whose centre is closest wins.
pub fn frequency_to_channel(freq: u32) -> u32 {
    CHANNEL_RANGES
        .iter()
        .filter(|(low, high, _)| (*low..*high).contains(&freq))
        .min_by_key(|(low, high, _)| ((low + high) / 2).abs_diff(freq))
        .map(|(_, _, channel)| *channel)
        .unwrap_or(0)
}

/// Rates an RSSI in dBm.
pub fn rate_signal(rssi: i32) -> SignalRating {
    match rssi {
        r if r >= -50 => SignalRating::Excellent,
        r if r >= -60 => SignalRating::Good,
        r if r >= -70 => SignalRating::Fair,
        r if r >= -80 => SignalRating::Poor,
        _ => SignalRating::None,
    }
}

/// Decodes SSID bytes, replacing invalid UTF-8.
pub(crate) fn decode_ssid(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}

/// Builds a classified [`AccessPoint`] from raw bus properties.
pub(crate) fn classify_access_point(raw: &RawAccessPoint) -> AccessPoint {
    let rssi = -i32::from(raw.strength);
    AccessPoint {
        ssid: decode_ssid(&raw.ssid),
        bssid: raw.hw_address.clone(),
        rssi,
        frequency: raw.frequency,
        channel: frequency_to_channel(raw.frequency),
        signal_rating: rate_signal(rssi),
        security: classify_security(raw.wpa_flags, raw.rsn_flags),
        eap_config: None,
    }
}
