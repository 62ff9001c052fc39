//! The commitment text and Indonesian date formatting.

use time::{Date, Month, OffsetDateTime};

const MONTHS_LONG: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "Mei", "Jun", "Jul", "Agu", "Sep", "Okt", "Nov", "Des",
];

fn month_index(month: Month) -> usize {
    u8::from(month) as usize - 1
}

/// `16 Oktober 2026`
pub fn format_long_date(date: Date) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_LONG[month_index(date.month())],
        date.year()
    )
}

/// `16 Okt 2026, 08.30` -- used when listing stored submissions.
pub fn format_display_datetime(instant: OffsetDateTime) -> String {
    format!(
        "{} {} {}, {:02}.{:02}",
        instant.day(),
        MONTHS_SHORT[month_index(instant.month())],
        instant.year(),
        instant.hour(),
        instant.minute()
    )
}

const COMMITMENT_POINTS: [&str; 10] = [
    "Menjadikan budaya perusahaan (EXPRESI) sebagai landasan dalam bersikap dan berperilaku",
    "Mendukung setiap program dan strategi manajemen sehingga target perusahaan bisa tercapai",
    "Melibatkan diri dalam program pengembangan dan transformasi perusahaan",
    "Melakukan dan menerapkan cara baru untuk meningkatkan hasil dan perbaikan proses kerja",
    "Membangun Kerja sama tim agar menumbuhkan keinginan untuk menemukan inovasi dalam melakukan perbaikan kinerja",
    "Mendorong Budaya Kerja (EXPRESI) yang berorientasi pada perbaikan secara berkelanjutan untuk meningkatkan kepuasan pelanggan dan kinerja",
    "Menjaga nama baik dan menjunjung tinggi martabat serta kehormatan Bank",
    "Memahami perilaku yang harus dilakukan (kewajiban) dan menjauhi perilaku yang tidak boleh dilakukan (larangan) sebagai pekerja bank jatim",
    "Melaporkan jika ditemukan adanya benturan kepentingan sesuai dengan ketentuan internal yang berlaku",
    "Dilarang menerima atau meminta gratifikasi yang dianggap suap baik langsung maupun tidak langsung dari pihak manapun dalam rangka mempengaruhi kebijakan/keputusan/perilaku pejabat dan pekerja bank sesuai jabatan wewenang dan tanggung jawab yang dimiliki",
];

/// Render the commitment text for the given signing date.
pub fn commitment_text(date: Date) -> String {
    let mut text = String::from("Dengan Rahmat Tuhan yang maha Kuasa\n\n");
    text.push_str(&format!(
        "Pada hari ini, {} dalam hal ini kami bertindak sebagai diri kami sendiri dan pegawai bank jatim berkomitmen untuk menjadi pegawai militan dengan cara:\n\n",
        format_long_date(date)
    ));
    for (i, point) in COMMITMENT_POINTS.iter().enumerate() {
        text.push_str(&format!("{}. {}\n", i + 1, point));
    }
    text.push_str(
        "\nDemikian komitmen ini kami buat dengan sebenar-benarnya dan akan kami lakukan dengan sungguh-sungguh",
    );
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn long_date_uses_indonesian_month_names() {
        assert_eq!(format_long_date(date!(2026 - 10 - 16)), "16 Oktober 2026");
        assert_eq!(format_long_date(date!(2025 - 01 - 03)), "3 Januari 2025");
    }

    #[test]
    fn display_datetime_pads_time() {
        let dt = datetime!(2026-08-05 07:04:00 UTC);
        assert_eq!(format_display_datetime(dt), "5 Agu 2026, 07.04");
    }

    #[test]
    fn text_embeds_date_and_all_points() {
        let text = commitment_text(date!(2026 - 10 - 16));
        assert!(text.starts_with("Dengan Rahmat Tuhan"));
        assert!(text.contains("Pada hari ini, 16 Oktober 2026 dalam hal ini"));
        assert!(text.contains("\n1. Menjadikan budaya perusahaan"));
        assert!(text.contains("\n10. Dilarang menerima"));
        assert!(text.ends_with("dengan sungguh-sungguh"));
    }
}
