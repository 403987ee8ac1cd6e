// Parse/serialize behaviour on whole documents

use folio::pagination::{DEFAULT_PAGE_EXTENT, PageEstimator, estimate_pages};
use folio::richtext::html_converter::{extract_text, parse, serialize};
use folio::templates::TEMPLATES;
use pretty_assertions::assert_eq;

const MIXED: &str = concat!(
    "<h1 style=\"text-align: center;\">Başlık</h1>",
    "<p>Düz <b>kalın</b> <i>eğik</i> <u>altı çizili</u><br>yeni satır</p>",
    "<ol><li>bir</li><li>iki</li></ol>",
    "<table><tbody><tr><th>Yıl</th><th>Değer</th></tr><tr><td>2024</td><td>4.2</td></tr></tbody></table>",
    "<div class=\"manual-page-break\" contenteditable=\"false\"></div>",
    "<p><br></p>",
    "<figure><img src=\"grafik.png\"><figcaption>Şekil 1</figcaption></figure>",
    "<h5>Not</h5>",
);

/// Inputs that stress the lenient reader
const IRREGULAR: &[&str] = &[
    MIXED,
    "a<p>x</p><br>",
    "<br><br>",
    "<p>bir<br></p><br>",
    "<b>kalın</b> ve <i>eğik</i> metin",
    "  boşluklu <u>metin</u>  <p>sonra</p>",
    "<p>açık <b>kalmış",
    "<h1>Başlık<p>paragraf<h2>alt",
    "</div><p>a</span>b</p></p></li>",
    "<ul><li></li><li>x</li></ul><ol><li><br></li></ol>",
    "<table><tr><td></td><td>y</td></tr><tr><th></th></tr></table>",
    "<h2>Baş<!-- not -->lık</h2><!-- blok -->",
    "<table><tr><td colspan=\"2\">Toplam</td></tr><tr><td>a</td><td>b</td></tr></table>",
    "<table border=\"1\"><thead><tr><th>Yıl</th></tr></thead></table>",
    "<p class=\"lead\">Özet</p><h3 id=\"s\">Sonuç</h3>",
    "<p>a</p><div class=\"manual-page-break\" contenteditable=\"false\"></div><p>b</p>",
    "<html><body><p>gövde</p></body></html>",
    "<div><p>iç</p>",
    "<p>a &amp; b &lt; c</p>&nbsp;",
    "<p>x<sup>2</sup><img src=\"a.png\"></p>",
    "",
];

#[test]
fn serialize_parse_preserves_text() {
    for markup in IRREGULAR {
        let first = parse(markup);
        let second = parse(&serialize(&first));
        assert_eq!(extract_text(&second), extract_text(&first), "input: {markup:?}");
    }
}

#[test]
fn serialization_is_stable_after_one_pass() {
    for markup in IRREGULAR {
        let once = serialize(&parse(markup));
        assert_eq!(serialize(&parse(&once)), once, "input: {markup:?}");
    }
}

#[test]
fn attributed_table_keeps_its_shape() {
    let markup = "<table><tr><td colspan=\"2\">Toplam</td></tr><tr><td>a</td><td>b</td></tr></table>";
    assert_eq!(serialize(&parse(markup)), markup);
    assert_eq!(extract_text(&parse(markup)), "Toplam a b");
}

#[test]
fn page_break_adds_no_extra_space() {
    let doc = parse(
        "<p>a</p><div class=\"manual-page-break\" contenteditable=\"false\"></div><p><br></p><p>b</p>",
    );
    assert_eq!(extract_text(&doc), "a b");
}

#[test]
fn recognized_markup_round_trips_exactly() {
    assert_eq!(serialize(&parse(MIXED)), MIXED);
}

#[test]
fn messy_markup_is_normalized() {
    let messy = "\n  <P>bir<strong>iki</STRONG>\n<h2>üç\n<!-- yorum --><div class=\"x\">açık kalmış";
    insta::assert_snapshot!(
        serialize(&parse(messy)),
        @r#"<p>bir<b>iki</b>
</p><h2>üç
<!-- yorum --></h2><div class="x">açık kalmış"#
    );
}

#[test]
fn extract_text_separates_blocks() {
    let doc = parse("<h1>A</h1><p>b</p><div><p>c</p><p>d</p></div>");
    assert_eq!(extract_text(&doc), "A b c d");
}

#[test]
fn templates_estimate_single_page() {
    let estimator = PageEstimator::default();
    for template in TEMPLATES {
        assert_eq!(estimator.page_count(&parse(template.content)), 1, "{}", template.key);
    }
}

#[test]
fn page_estimate_grows_with_content() {
    let estimator = PageEstimator::default();
    let mut markup = String::new();
    let mut last = estimator.page_count(&parse(&markup));
    assert_eq!(last, 1);

    for i in 0..60 {
        markup.push_str(&format!("<h2>Bölüm {i}</h2><p>{}</p>", "uzun bir cümle ".repeat(20)));
        let pages = estimator.page_count(&parse(&markup));
        assert!(pages >= last);
        last = pages;
    }
    assert!(last > 1);
    assert_eq!(estimate_pages(DEFAULT_PAGE_EXTENT * 2.5, DEFAULT_PAGE_EXTENT), 3);
}
