// Starter documents offered when creating a new document.

/// A named starting point for a new document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Template {
    pub key: &'static str,
    pub title: &'static str,
    pub content: &'static str,
}

pub const BLANK_KEY: &str = "blank";

/// Title given to documents that were never named
pub const UNTITLED: &str = "İsimsiz Çalışma";

pub static TEMPLATES: &[Template] = &[
    Template {
        key: BLANK_KEY,
        title: "Yeni Çalışma",
        content: "<p><br></p>",
    },
    Template {
        key: "literature",
        title: "Literatür Taraması: Derin Öğrenme ve Radyoloji",
        content: concat!(
            "<h1>RADYOLOJİDE DERİN ÖĞRENME: LİTERATÜR ANALİZİ</h1>",
            "<h3>1. GİRİŞ</h3><p>Son on yılda, konvolüsyonel sinir ağları (CNN), tıbbi görüntü işlemede devrim yaratmıştır. ",
            "Özellikle Smith ve ark. (2021) tarafından yapılan çalışmalar, göğüs röntgenlerinde anomali tespitinde %98 doğruluk oranına ulaşılabileceğini göstermiştir.</p>",
            "<h3>2. MEVCUT ÇALIŞMALAR</h3><p>Jones (2022), veri setlerinin çeşitliliğinin model başarısındaki en kritik faktör olduğunu savunmaktadır. ",
            "Buna karşılık, Karpat (2023) algoritmik verimliliğin donanım kısıtlı ortamlarda daha öncelikli olduğunu belirtmiştir.</p>",
            "<p><i>NOT: Bu taslağı genişletmek için AI Sohbeti'ne \"Bu çalışmalardaki metodolojik farkları özetle\" diyebilirsiniz.</i></p>",
        ),
    },
    Template {
        key: "data",
        title: "Veri Analizi: Öğrenci Motivasyon Anketi",
        content: concat!(
            "<h1>ANKET VERİLERİ VE ANALİZ RAPORU</h1>",
            "<h3>HAM VERİ SETİ (Kopyalanabilir)</h3>",
            "<p>Cinsiyet, Puan, Motivasyon_Skoru, Katılım_Oranı</p>",
            "<p>Kadın, 85, 4.2, 0.92 | Erkek, 78, 3.8, 0.85 | Kadın, 92, 4.8, 0.98 | Erkek, 65, 3.1, 0.70 | Kadın, 88, 4.5, 0.95</p>",
            "<p><b>ANALİZ GÖREVİ:</b> Bu ham verileri kopyalayıp \"İstatistik Görselleştirici\" ajanına yapıştırarak profesyonel bir akademik tablo oluşturabilirsiniz.</p>",
        ),
    },
    Template {
        key: "audit",
        title: "Yayın Denetimi: Sosyal Medya ve Psikoloji",
        content: concat!(
            "<h1>MAKALE DENETİM TASLAĞI</h1>",
            "<p>Aşağıdaki metin editör aşamasından geçmesi için analiz edilmelidir:</p>",
            "<p>\"Sosyal medya kullanımı gençlerde anksiyete yapar. Birçok araştırma bunu kanıtlamıştır. ",
            "Bu makalede biz de bu konuyu inceledik ve benzer sonuçlar bulduk. Metodumuz ise anket yapmak üzerine kuruludur.\"</p>",
            "<p><i>NOT: Bu metni \"Desk Rejection Simülatörü\" ajanı ile taratarak neden reddedilebileceğini görebilirsiniz.</i></p>",
        ),
    },
    Template {
        key: "grant",
        title: "TÜBİTAK 1001: Akıllı Şehir Atık Yönetimi",
        content: concat!(
            "<h1>PROJE ÖNERİSİ: AKILLI ŞEHİRLERDE SIFIR ATIK</h1>",
            "<h3>1. ÖZGÜN DEĞER</h3><p>Önerilen proje, kentsel atık toplama rotalarını yapay zeka tabanlı \"gerçek zamanlı sensör füzyonu\" ile optimize etmeyi hedeflemektedir. ",
            "Mevcut sistemler statik planlama yaparken, bu proje dinamik yük takibi sunmaktadır.</p>",
            "<h3>2. YÖNTEM</h3><p>Atık konteynerlerine yerleştirilecek ultrasonik mesafe sensörleri, doluluk oranlarını LoRaWAN protokolü üzerinden merkeze iletecektir.</p>",
        ),
    },
    Template {
        key: "thesis",
        title: "Tez Yazım Taslağı: Blokzincir ve Tedarik Zinciri",
        content: concat!(
            "<h1>TEZ: BLOKZİNCİR TEKNOLOJİSİNİN LOJİSTİKTEKİ ETKİSİ</h1>",
            "<h3>ÖZET</h3><p>Bu çalışma, hiper-yerel tedarik zincirlerinde şeffaflık sorununu blokzincir teknolojisi ile çözmeyi amaçlamaktadır. ",
            "İlk bulgular, güven maliyetlerinin %40 oranında azaldığını göstermektedir.</p>",
        ),
    },
    Template {
        key: "conference",
        title: "Görsel Analiz Taslağı: Karbon Emisyonları",
        content: concat!(
            "<h1>KÜRESEL EMİSYON TRENDLERİ ANALİZİ</h1>",
            "<h3>ŞEKİL 1: KARBON EMİSYONLARI</h3>",
            "<p>[BURAYA GÖRSEL GELECEK: 2018-2024 Karbon Emisyonu Grafiği]</p>",
            "<p>Grafikteki veriler emisyonların 2020'de düştüğünü ama sonra hızla arttığını gösteriyor.</p>",
            "<p><b>GÖREV:</b> Sağdaki \"Şekil Yorumlayıcı\" ajanına demo veriyi yükleyip çalıştırarak bu bölümü profesyonelce güncelleyin.</p>",
        ),
    },
];

/// Look up a template by key; unknown keys give the blank template
pub fn find(key: &str) -> &'static Template {
    TEMPLATES
        .iter()
        .find(|t| t.key == key)
        .unwrap_or(&TEMPLATES[0])
}

pub fn blank() -> &'static Template {
    &TEMPLATES[0]
}
